/// One run of a sweep: `task_count` MPI tasks spread over `node_count` nodes,
/// with at most `max_tasks_per_node` tasks on any node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SweepConfiguration {
    pub node_count: u32,
    pub task_count: u32,
    pub max_tasks_per_node: u32,
}

impl SweepConfiguration {
    pub fn new(node_count: u32, task_count: u32, max_tasks_per_node: u32) -> Self {
        debug_assert!(node_count >= 1 && task_count >= 1 && max_tasks_per_node >= 1);
        debug_assert!(u64::from(task_count) <= u64::from(node_count) * u64::from(max_tasks_per_node));
        Self {
            node_count,
            task_count,
            max_tasks_per_node,
        }
    }

    pub fn tasks_per_node(&self) -> u32 {
        self.task_count / self.node_count
    }

    /// Total number of cores in use.
    pub fn core_count(&self) -> u32 {
        self.node_count * self.tasks_per_node()
    }

    /// True if the run leaves cores idle on the nodes it occupies.
    pub fn is_partial_node(&self) -> bool {
        self.tasks_per_node() < self.max_tasks_per_node || self.task_count < self.max_tasks_per_node
    }

    /// Name of the run directory (and job) for this configuration of `case_name`.
    pub fn run_name(&self, case_name: &str) -> String {
        format!(
            "{}-{}x{}cores",
            case_name,
            self.node_count,
            self.tasks_per_node()
        )
    }
}
