use combine::parser::char::{char, string};
use combine::{eof, EasyParser};

use crate::parse::unsigned;

/// Marks a results directory created by a sweep, e.g. `cavity-strong-scaling-test-128.128`.
pub const RESULTS_DIR_INFIX: &str = "-strong-scaling-test";

/// The parts of a run directory name `{case}-{nodes}x{tasks_per_node}cores`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunDirName<'a> {
    pub case: &'a str,
    pub nodes: u64,
    pub tasks_per_node: u64,
}

impl RunDirName<'_> {
    pub fn cores(&self) -> u64 {
        self.nodes * self.tasks_per_node
    }
}

/// Parse a run directory name. Case names may themselves contain '-',
/// so the node/core suffix is split off at the *last* '-'.
pub fn run_dir_name(name: &str) -> Option<RunDirName<'_>> {
    let (case, suffix) = name.rsplit_once('-')?;
    if case.is_empty() {
        return None;
    }
    let ((nodes, _, tasks_per_node, _, _), _) =
        (unsigned(), char('x'), unsigned(), string("cores"), eof())
            .easy_parse(suffix)
            .ok()?;
    if nodes == 0 || tasks_per_node == 0 {
        return None;
    }
    Some(RunDirName {
        case,
        nodes,
        tasks_per_node,
    })
}

/// Extract the case name from a results directory named `{case}-strong-scaling-test*`.
pub fn case_from_results_dir(name: &str) -> Option<&str> {
    match name.find(RESULTS_DIR_INFIX) {
        Some(0) | None => None,
        Some(idx) => Some(&name[..idx]),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_run_dir_name() {
        assert_eq!(
            Some(RunDirName {
                case: "fixedIter",
                nodes: 2,
                tasks_per_node: 64
            }),
            run_dir_name("fixedIter-2x64cores")
        );
    }

    #[test]
    fn test_run_dir_name_with_dashes_in_case() {
        let parsed = run_dir_name("cavity-3d-1x16cores").unwrap();
        assert_eq!("cavity-3d", parsed.case);
        assert_eq!(16, parsed.cores());
    }

    #[test]
    fn test_run_dir_name_rejects_others() {
        assert_eq!(None, run_dir_name("fixedIter"));
        assert_eq!(None, run_dir_name("-1x1cores"));
        assert_eq!(None, run_dir_name("case-1x1cores.bak"));
        assert_eq!(None, run_dir_name("case-0x4cores"));
        assert_eq!(None, run_dir_name("case-1x4"));
        assert_eq!(None, run_dir_name("case-strong-scaling-test-64.64"));
    }

    #[test]
    fn test_case_from_results_dir() {
        assert_eq!(
            Some("cavity-3d"),
            case_from_results_dir("cavity-3d-strong-scaling-test-128.64")
        );
        assert_eq!(Some("fixedIter"), case_from_results_dir("fixedIter-strong-scaling-test"));
        assert_eq!(None, case_from_results_dir("-strong-scaling-test"));
        assert_eq!(None, case_from_results_dir("results"));
    }
}
