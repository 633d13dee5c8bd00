use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::time::Instant;

use abl_case::Case;
use abl_fields::FieldStore;
use abl_solver::{
    AblSolver, Communicator, REFRESH_TIMING, SerialComm, SolverResult, build_partition,
    resolve_pressure_reference, run_partitioned, setup,
};

#[derive(Parser)]
#[command(name = "abl")]
#[command(about = "ABL solver - atmospheric boundary layer setup and closure refresh", long_about = None)]
struct Cli {
    /// Log per-stage timings
    #[arg(long, global = true)]
    timing: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate the case file and the start-time fields
    Check {
        /// Case directory holding case.yaml
        case_dir: PathBuf,
    },
    /// Run solver setup and report the pressure reference
    Setup {
        /// Case directory holding case.yaml
        case_dir: PathBuf,
        /// Number of mesh partitions
        #[arg(short, long, default_value_t = 1)]
        partitions: usize,
    },
    /// Set up, then run closure refresh cycles
    Refresh {
        /// Case directory holding case.yaml
        case_dir: PathBuf,
        /// Number of mesh partitions
        #[arg(short, long, default_value_t = 1)]
        partitions: usize,
        /// Number of refresh cycles
        #[arg(short, long, default_value_t = 1)]
        iterations: usize,
        /// Write the refreshed fields to this time directory
        #[arg(short, long)]
        write: Option<String>,
    },
}

fn main() -> SolverResult<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    if cli.timing {
        abl_core::timing::enable_timing();
    }

    match cli.command {
        Commands::Check { case_dir } => cmd_check(&case_dir),
        Commands::Setup {
            case_dir,
            partitions,
        } => cmd_setup(&case_dir, partitions),
        Commands::Refresh {
            case_dir,
            partitions,
            iterations,
            write,
        } => cmd_refresh(&case_dir, partitions, iterations, write.as_deref()),
    }
}

fn cmd_check(case_dir: &Path) -> SolverResult<()> {
    println!("Checking case: {}", case_dir.display());
    let case = Case::load(case_dir)?;
    let mesh = build_partition(&case.def, &SerialComm)?;
    println!(
        "  Mesh: {} cells, {} faces, {} patches",
        mesh.n_cells(),
        mesh.n_faces(),
        mesh.patches().len()
    );

    let fields = FieldStore::read(&mesh, &case.start_dir())?;
    println!("  p_rgh boundary:");
    for (patch, pf) in mesh.patches().iter().zip(fields.p_rgh.patches()) {
        println!("    {:<8} {}", patch.name, pf.condition().type_name());
    }

    let reference = resolve_pressure_reference(
        &mesh,
        &fields,
        &case.def.pimple,
        case.def.abl.update_fixes_value,
        &SerialComm,
    )?;
    if reference.needed {
        println!(
            "  Pressure reference: cell {} = {}",
            case.def.pimple.p_ref_cell, reference.value
        );
    } else {
        println!("  Pressure level fixed by the boundary");
    }
    println!("✓ Case is valid");
    Ok(())
}

/// Run `f` on every partition and return the master's result.
fn on_partitions<R, F>(partitions: usize, f: F) -> SolverResult<R>
where
    R: Send,
    F: Fn(&dyn Communicator) -> SolverResult<R> + Sync,
{
    if partitions <= 1 {
        return f(&SerialComm);
    }
    let mut results = run_partitioned(partitions, |comm| f(comm)).into_iter();
    let master = results.next().ok_or(abl_solver::SolverError::Configuration {
        what: "at least one partition is required".to_string(),
    })?;
    for r in results {
        r?;
    }
    master
}

fn report(solver: &AblSolver) {
    let r = &solver.reference;
    if r.needed {
        println!("  Reference needed: yes (pRefValue = {})", r.value);
    } else {
        println!("  Reference needed: no");
    }
    let h = solver.buoyancy.h_ref();
    println!("  hRef: ({:.3}, {:.3}, {:.3}) m", h.x, h.y, h.z);
    println!("  Pressure shift: {:.6e}", solver.pressure_shift);
    println!(
        "  Models: {} / {}",
        solver.closure.transport().name(),
        solver.closure.turbulence().name()
    );
}

fn cmd_setup(case_dir: &Path, partitions: usize) -> SolverResult<()> {
    let case = Case::load(case_dir)?;
    println!("Setting up {} on {} partition(s)", case.def.name, partitions.max(1));

    let start = Instant::now();
    on_partitions(partitions, |comm| {
        let solver = setup(&case, comm)?;
        if comm.is_master() {
            report(&solver);
        }
        Ok(())
    })?;
    println!("✓ Setup completed in {:.3} s", start.elapsed().as_secs_f64());
    Ok(())
}

fn cmd_refresh(
    case_dir: &Path,
    partitions: usize,
    iterations: usize,
    write: Option<&str>,
) -> SolverResult<()> {
    let case = Case::load(case_dir)?;
    println!(
        "Refreshing {} for {} cycle(s) on {} partition(s)",
        case.def.name,
        iterations,
        partitions.max(1)
    );

    let start = Instant::now();
    on_partitions(partitions, |comm| {
        let mut solver = setup(&case, comm)?;
        for i in 0..iterations {
            if i > 0 {
                solver.mark_stale();
            }
            solver.refresh()?;
        }

        let kappat = solver.fields.kappat.internal();
        let total = comm.sum(kappat.iter().sum());
        let cells = comm.sum(kappat.len() as f64);

        if let Some(time) = write {
            let dir = if comm.size() > 1 {
                case.root.join(format!("processor{}", comm.rank())).join(time)
            } else {
                case.time_dir(time)
            };
            solver.write(&dir)?;
            tracing::info!(rank = comm.rank(), dir = %dir.display(), "wrote fields");
        }

        if comm.is_master() {
            report(&solver);
            println!("  Mean kappat: {:.6e} m2/s", total / cells);
        }
        Ok(())
    })?;
    println!("✓ Refresh completed in {:.3} s", start.elapsed().as_secs_f64());
    if REFRESH_TIMING.calls() > 0 {
        println!(
            "  Closure refresh: {} call(s), {:.3} ms mean",
            REFRESH_TIMING.calls(),
            REFRESH_TIMING.mean_seconds() * 1e3
        );
    }
    Ok(())
}
