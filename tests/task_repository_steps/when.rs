//! When steps for task repository BDD scenarios.

use super::world::{RepositoryWorld, run_async};
use eyre::WrapErr;
use rstest_bdd_macros::when;

#[when("the task is created")]
fn create_task(world: &mut RepositoryWorld) -> Result<(), eyre::Report> {
    let document = world
        .pending_document
        .clone()
        .ok_or_else(|| eyre::eyre!("missing pending document in scenario world"))?;
    let id = run_async(world.repository.create(document)).wrap_err("create task")?;
    world.created_id = Some(id);
    Ok(())
}

#[when("the task is requested by its identifier")]
fn get_created_task(world: &mut RepositoryWorld) -> Result<(), eyre::Report> {
    let id = world
        .created_id
        .clone()
        .ok_or_else(|| eyre::eyre!("missing created identifier in scenario world"))?;
    world.last_get_result = Some(run_async(world.repository.get(&id)));
    Ok(())
}

#[when("the task is deleted")]
fn delete_created_task(world: &mut RepositoryWorld) -> Result<(), eyre::Report> {
    let id = world
        .created_id
        .clone()
        .ok_or_else(|| eyre::eyre!("missing created identifier in scenario world"))?;
    world.last_delete_result = Some(run_async(world.repository.delete(&id)));
    Ok(())
}

#[when(r#"the task "{id}" is requested"#)]
fn get_task_by_literal_id(world: &mut RepositoryWorld, id: String) {
    world.last_get_result = Some(run_async(world.repository.get(&id)));
}

#[when(r#"the task "{id}" is deleted"#)]
fn delete_task_by_literal_id(world: &mut RepositoryWorld, id: String) {
    world.last_delete_result = Some(run_async(world.repository.delete(&id)));
}

#[when("tags are aggregated")]
fn aggregate_tags(world: &mut RepositoryWorld) {
    world.last_aggregate_result = Some(run_async(world.repository.aggregate_by_tags()));
}
