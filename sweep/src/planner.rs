use crate::{Error, SweepConfiguration};

/// Plan a strong-scaling sweep, in order of increasing core count.
///
/// Single-node runs halve the task count from `max_tasks_per_node` down to 1;
/// multi-node runs then double nodes and tasks together, keeping every node full,
/// until `max_nodes` is reached.
pub fn plan(max_tasks_per_node: u32, max_nodes: u32) -> Result<Vec<SweepConfiguration>, Error> {
    if max_tasks_per_node == 0 {
        return Err(Error::InvalidTaskCeiling);
    }
    if max_nodes == 0 {
        return Err(Error::ZeroNodes);
    }

    let mut single_node = Vec::with_capacity(8);
    let mut tasks = max_tasks_per_node;
    single_node.push(tasks);
    while tasks > 1 {
        tasks /= 2;
        single_node.push(tasks);
    }

    let mut configs: Vec<SweepConfiguration> = single_node
        .into_iter()
        .rev()
        .map(|tasks| SweepConfiguration::new(1, tasks, max_tasks_per_node))
        .collect();

    let (mut nodes, mut tasks) = (1u32, max_tasks_per_node);
    while nodes < max_nodes {
        (nodes, tasks) = nodes
            .checked_mul(2)
            .zip(tasks.checked_mul(2))
            .ok_or(Error::TooManyNodes(max_nodes, max_tasks_per_node))?;
        configs.push(SweepConfiguration::new(nodes, tasks, max_tasks_per_node));
    }

    log::debug!(
        "planned {} runs: {:?}",
        configs.len(),
        configs
            .iter()
            .map(|c| (c.node_count, c.task_count))
            .collect::<Vec<_>>()
    );
    Ok(configs)
}
