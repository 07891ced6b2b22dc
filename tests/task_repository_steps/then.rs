//! Then steps for task repository BDD scenarios.

use super::world::RepositoryWorld;
use rstest_bdd_macros::then;
use serde_json::{Value, json};
use task_service::task::domain::Document;

fn returned_task(world: &RepositoryWorld) -> Result<Option<&Document>, eyre::Report> {
    let result = world
        .last_get_result
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing get result in scenario world"))?;
    let found = result
        .as_ref()
        .map_err(|err| eyre::eyre!("unexpected get failure: {err}"))?;
    Ok(found.as_ref())
}

fn last_deleted(world: &RepositoryWorld) -> Result<bool, eyre::Report> {
    let result = world
        .last_delete_result
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing delete result in scenario world"))?;
    result
        .clone()
        .map_err(|err| eyre::eyre!("unexpected delete failure: {err}"))
}

#[then(r#"the returned task has title "{title}""#)]
fn returned_task_has_title(world: &RepositoryWorld, title: String) -> Result<(), eyre::Report> {
    let task = returned_task(world)?.ok_or_else(|| eyre::eyre!("expected a task"))?;
    eyre::ensure!(
        task.get("title") == Some(&Value::String(title.clone())),
        "expected title {title}, found {:?}",
        task.get("title")
    );
    Ok(())
}

#[then("the returned task has an empty tag list")]
fn returned_task_has_no_tags(world: &RepositoryWorld) -> Result<(), eyre::Report> {
    let task = returned_task(world)?.ok_or_else(|| eyre::eyre!("expected a task"))?;
    eyre::ensure!(
        task.get("tags") == Some(&json!([])),
        "expected empty tags, found {:?}",
        task.get("tags")
    );
    Ok(())
}

#[then("the returned task carries the created identifier")]
fn returned_task_has_created_id(world: &RepositoryWorld) -> Result<(), eyre::Report> {
    let task = returned_task(world)?.ok_or_else(|| eyre::eyre!("expected a task"))?;
    let created = world
        .created_id
        .as_deref()
        .ok_or_else(|| eyre::eyre!("missing created identifier in scenario world"))?;
    eyre::ensure!(
        task.id() == Some(created),
        "expected identifier {created}, found {:?}",
        task.id()
    );
    Ok(())
}

#[then("no task is returned")]
fn no_task_returned(world: &RepositoryWorld) -> Result<(), eyre::Report> {
    eyre::ensure!(returned_task(world)?.is_none(), "expected no task");
    Ok(())
}

#[then("the task is reported deleted")]
fn task_reported_deleted(world: &RepositoryWorld) -> Result<(), eyre::Report> {
    eyre::ensure!(last_deleted(world)?, "expected delete to report true");
    Ok(())
}

#[then("nothing is reported deleted")]
fn nothing_reported_deleted(world: &RepositoryWorld) -> Result<(), eyre::Report> {
    eyre::ensure!(!last_deleted(world)?, "expected delete to report false");
    Ok(())
}

#[then(r#"the tag counts are "{expected}""#)]
fn tag_counts_are(world: &RepositoryWorld, expected: String) -> Result<(), eyre::Report> {
    let result = world
        .last_aggregate_result
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing aggregate result in scenario world"))?;
    let counts = result
        .as_ref()
        .map_err(|err| eyre::eyre!("unexpected aggregate failure: {err}"))?;
    let actual: Vec<String> = counts
        .iter()
        .map(|record| format!("{}={}", record.tag_str().unwrap_or_default(), record.count()))
        .collect();
    let wanted: Vec<String> = expected.split(',').map(str::to_owned).collect();
    eyre::ensure!(actual == wanted, "expected {wanted:?}, found {actual:?}");
    Ok(())
}

#[then("no tag counts are returned")]
fn no_tag_counts(world: &RepositoryWorld) -> Result<(), eyre::Report> {
    let result = world
        .last_aggregate_result
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing aggregate result in scenario world"))?;
    let counts = result
        .as_ref()
        .map_err(|err| eyre::eyre!("unexpected aggregate failure: {err}"))?;
    eyre::ensure!(counts.is_empty(), "expected no tag counts, found {counts:?}");
    Ok(())
}
