use crate::{ClusterProfile, SweepConfiguration, Walltime};

/// Render the job script for one run of a sweep.
///
/// Every value used in the script is bound from the arguments up front,
/// so each branch of the script sees the same, fully-initialized inputs.
pub fn render(
    profile: &ClusterProfile,
    config: &SweepConfiguration,
    run_name: &str,
    solver: &str,
    walltime: &Walltime,
) -> String {
    let mut strbuf = String::with_capacity(1024);
    let mut script = JobScriptBuilder::new(&mut strbuf);
    script.write_directives(config, run_name, walltime);
    script.write_cluster_directives(profile);
    script.write_environment(profile);
    script.write_preprocessing(profile);
    if config.task_count == 1 {
        script.write_serial_processing(run_name, solver);
    } else {
        let partial = occupies_partial_nodes(profile, config);
        let launcher = profile.launch.select(partial).prefix(config);
        log::trace!("{run_name}: partial nodes = {partial}, launcher = '{launcher}'");
        script.write_parallel_processing(config, run_name, solver, &launcher);
    }
    strbuf
}

/// A sweep capped below the cluster's cores per node never fills a node.
fn occupies_partial_nodes(profile: &ClusterProfile, config: &SweepConfiguration) -> bool {
    config.is_partial_node() || config.max_tasks_per_node < profile.cores_per_node
}

/// Utility for building the contents of a job script.
/// Note that it modifies a String reference held internally;
/// read that String to get the script's contents.
#[derive(Debug)]
pub struct JobScriptBuilder<'a> {
    strbuf: &'a mut String,
}

impl<'a> JobScriptBuilder<'a> {
    pub fn new(strbuf: &'a mut String) -> Self {
        strbuf.clear();
        Self { strbuf }
    }
}

impl JobScriptBuilder<'_> {
    /// shebang and scheduler directives common to every cluster.
    pub fn write_directives(
        &mut self,
        config: &SweepConfiguration,
        run_name: &str,
        walltime: &Walltime,
    ) {
        self.line("#!/bin/bash");
        self.line(&format!("#SBATCH --nodes={} --exclusive", config.node_count));
        self.line(&format!("#SBATCH --time={}", walltime.format()));
        self.line(&format!("#SBATCH --job-name={run_name}"));
        // %x expands to the job name:
        self.line("#SBATCH -o %x.stdout");
        self.line("#SBATCH -e %x.stderr");
    }

    pub fn write_cluster_directives(&mut self, profile: &ClusterProfile) {
        if let Some(account) = &profile.scheduler_account {
            self.line(&format!("#SBATCH --account={account}"));
        }
        if profile.needs_env_unset {
            self.line("");
            self.line("unset SLURM_EXPORT_ENV");
            self.line("echo \"JOB ID = $SLURM_JOB_ID\"");
        }
    }

    /// purge modules, load the cluster's modules, source the solver environment.
    pub fn write_environment(&mut self, profile: &ClusterProfile) {
        self.line("");
        self.line("module --force purge");
        for module in &profile.bootstrap_modules {
            self.line(&format!("module load {module}"));
        }
        self.line("module list");
        self.line("");
        self.line("# Prepare OpenFOAM environment");
        self.line(&format!("source {}", profile.solver_bootstrap));
        self.line("");
    }

    pub fn write_preprocessing(&mut self, profile: &ClusterProfile) {
        self.line("# Preprocessing");
        if profile.mesh_precomputed_required {
            self.line("# blockMesh # (pre-processing already done)");
        } else {
            self.line("blockMesh");
        }
    }

    pub fn write_serial_processing(&mut self, run_name: &str, solver: &str) {
        self.line("renumberMesh -overwrite");
        self.line("# Processing");
        self.line(&format!("{solver} >& {run_name}.log"));
    }

    pub fn write_parallel_processing(
        &mut self,
        config: &SweepConfiguration,
        run_name: &str,
        solver: &str,
        launcher: &str,
    ) {
        self.line(&format!(
            "foamDictionary -entry numberOfSubdomains -set {} system/decomposeParDict",
            config.task_count
        ));
        self.line("rm -rf processor*");
        self.line("decomposePar");
        self.line(&format!("{launcher} renumberMesh -parallel -overwrite"));
        self.line("# Processing");
        self.line(&format!("{launcher} {solver} -parallel >& {run_name}.log"));
    }

    fn line(&mut self, text: &str) {
        self.strbuf.push_str(text);
        self.strbuf.push('\n');
    }
}
