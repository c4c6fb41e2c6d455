use anyhow::Result;
use std::path::{Path, PathBuf};
use strong_scaling::{App, Args, Command, PostArgs, RunArgs};
use tempfile::{tempdir, TempDir};

const CLUSTER_FILE: &str = r#"
[testbox]
cores_per_node = 4
bootstrap_modules = ["OpenFOAM/v2012"]
"#;

const RUN_NAMES: [&str; 4] = [
    "cavity-1x1cores",
    "cavity-1x2cores",
    "cavity-1x4cores",
    "cavity-2x4cores",
];

/// A base case, a cluster file, and a submit command that records each
/// submission and leaves a log behind, like a job that started running.
struct Fixture {
    dir: TempDir,
    case: PathBuf,
    cluster_file: PathBuf,
    submit_command: String,
}

impl Fixture {
    fn new() -> Result<Self> {
        simple_logging::log_to_stderr(log::LevelFilter::Debug);
        let dir = tempdir()?;
        let root = dir.path().canonicalize()?;

        let case = root.join("cavity");
        std::fs::create_dir_all(case.join("system"))?;
        std::fs::create_dir_all(case.join("constant"))?;
        std::fs::write(case.join("system/controlDict"), "endTime 1;\n")?;

        let cluster_file = root.join("clusters.toml");
        std::fs::write(&cluster_file, CLUSTER_FILE)?;

        let submit_command = root.join("fake-sbatch");
        let submissions = root.join("submissions.txt");
        std::fs::write(
            &submit_command,
            format!(
                "#!/bin/sh\necho \"$1\" >> {:?}\ntouch \"$(basename \"$1\" .slurm).log\"\necho \"Submitted batch job 1\"\n",
                submissions
            ),
        )?;
        make_executable(&submit_command)?;

        Ok(Self {
            dir,
            case,
            cluster_file,
            submit_command: submit_command.to_str().unwrap().to_owned(),
        })
    }

    fn root(&self) -> PathBuf {
        self.dir.path().canonicalize().unwrap()
    }

    fn destination(&self) -> PathBuf {
        self.root().join("cavity-strong-scaling-test-4.4")
    }

    fn submissions(&self) -> Vec<String> {
        std::fs::read_to_string(self.root().join("submissions.txt"))
            .unwrap_or_default()
            .lines()
            .map(str::to_owned)
            .collect()
    }

    fn run_args(&self) -> RunArgs {
        RunArgs {
            case: self.case.to_str().unwrap().to_owned(),
            cluster: Some("testbox".to_owned()),
            cluster_file: Some(self.cluster_file.to_str().unwrap().to_owned()),
            destination: None,
            solver: "icoFoam".to_owned(),
            max_nodes: 2,
            max_tasks_per_node: None,
            walltime: "0.5".to_owned(),
            overwrite: false,
            submit: true,
            submit_command: self.submit_command.clone(),
            yes: true,
            dry_run: false,
        }
    }

    fn post_args(&self) -> PostArgs {
        PostArgs {
            results: self.destination().to_str().unwrap().to_owned(),
            case: None,
            cluster: Some("testbox".to_owned()),
            clean: false,
            no_clean: false,
        }
    }
}

#[cfg(unix)]
fn make_executable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755))?;
    Ok(())
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) -> Result<()> {
    Ok(())
}

fn run_command(command: Command) -> Result<()> {
    let args = Args {
        verbose: 1,
        command,
    };
    App::new(args.try_into()?).run()
}

#[cfg(unix)]
#[test]
fn test_sweep_is_prepared_and_submitted_once() -> Result<()> {
    let fx = Fixture::new()?;
    run_command(Command::Run(fx.run_args()))?;

    let dest = fx.destination();
    for run_name in RUN_NAMES {
        let run_dir = dest.join(run_name);
        assert!(run_dir.join("system/controlDict").exists(), "{run_name} has a copy of the case");
        let script = std::fs::read_to_string(run_dir.join(format!("{run_name}.slurm")))?;
        assert!(script.contains("#SBATCH --time=0:30:00"));
        assert!(script.contains("module load OpenFOAM/v2012"));
    }
    let script = std::fs::read_to_string(dest.join("cavity-2x4cores/cavity-2x4cores.slurm"))?;
    assert!(script.contains("srun -np 8 icoFoam -parallel >& cavity-2x4cores.log"));

    let expected: Vec<String> = RUN_NAMES.iter().map(|n| format!("{n}.slurm")).collect();
    assert_eq!(expected, fx.submissions());

    // every run has a log now, so nothing is submitted again:
    run_command(Command::Run(fx.run_args()))?;
    assert_eq!(expected, fx.submissions());

    Ok(())
}

#[cfg(unix)]
#[test]
fn test_overwrite_recreates_and_resubmits() -> Result<()> {
    let fx = Fixture::new()?;
    run_command(Command::Run(fx.run_args()))?;

    let stale = fx.destination().join("cavity-1x2cores/processor0");
    std::fs::create_dir_all(&stale)?;

    let mut args = fx.run_args();
    args.overwrite = true;
    run_command(Command::Run(args))?;

    assert!(!stale.exists(), "run directory was recreated");
    assert_eq!(2 * RUN_NAMES.len(), fx.submissions().len());
    Ok(())
}

#[test]
fn test_dry_run_touches_nothing() -> Result<()> {
    let fx = Fixture::new()?;
    let mut args = fx.run_args();
    args.dry_run = true;
    run_command(Command::Run(args))?;

    assert!(!fx.destination().exists());
    assert!(fx.submissions().is_empty());
    Ok(())
}

#[test]
fn test_missing_precomputed_mesh_creates_no_runs() -> Result<()> {
    let fx = Fixture::new()?;
    let mut args = fx.run_args();
    args.cluster = Some("dodrio".to_owned());
    args.max_nodes = 1;
    args.max_tasks_per_node = Some(4);
    assert!(run_command(Command::Run(args)).is_err());

    let dest = fx.root().join("cavity-strong-scaling-test-128.4");
    assert!(!dest.exists(), "destination was not created");
    assert!(fx.submissions().is_empty());
    Ok(())
}

#[cfg(unix)]
#[test]
fn test_post_reports_and_cleans() -> Result<()> {
    let fx = Fixture::new()?;
    run_command(Command::Run(fx.run_args()))?;

    // pretend the jobs ran:
    let dest = fx.destination();
    for (i, run_name) in RUN_NAMES.iter().enumerate() {
        let run_dir = dest.join(run_name);
        let step = 8.0 / (1 << i) as f64;
        std::fs::write(
            run_dir.join(format!("{run_name}.log")),
            format!("ExecutionTime = 1 s\nExecutionTime = {} s\n", 1.0 + step),
        )?;
        std::fs::write(
            run_dir.join(format!("{run_name}.stdout")),
            "Create mesh for time = 0\n\nMesh region0 size: 8000\n",
        )?;
        std::fs::create_dir_all(run_dir.join("processor0/0"))?;
    }

    run_command(Command::Post(fx.post_args()))?;

    let table = std::fs::read_to_string(dest.join("cavity.parallel_efficiency.txt"))?;
    assert!(table.contains("Case cavity (on testbox)"));
    assert!(table.contains("         1         1     8.000     8.000      8000     1.0      1.000"));
    assert!(table.contains("         2         8     1.000     8.000      1000     8.0      1.000"));
    assert!(dest.join("cavity.parallel_efficiency.svg").exists());
    for run_name in RUN_NAMES {
        assert!(!dest.join(run_name).join("processor0").exists());
        assert!(dest.join(run_name).join("system").exists());
    }
    Ok(())
}

#[cfg(unix)]
#[test]
fn test_post_no_clean_keeps_processor_dirs() -> Result<()> {
    let fx = Fixture::new()?;
    run_command(Command::Run(fx.run_args()))?;
    let processor = fx.destination().join("cavity-1x2cores/processor1");
    std::fs::create_dir_all(&processor)?;

    let mut args = fx.post_args();
    args.no_clean = true;
    run_command(Command::Post(args))?;

    assert!(processor.exists());
    // the fake scheduler leaves empty logs, so no walltimes were found:
    let table = std::fs::read_to_string(fx.destination().join("cavity.parallel_efficiency.txt"))?;
    assert!(table.contains("n/a"));
    Ok(())
}
