use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Parser;
use colored::Colorize;
use secplan_core::{
    build_model, solve, AvailabilityMap, NeedIndex, ObjectiveWeights, Week,
    DEFAULT_TIME_LIMIT_SECS,
};
use std::path::PathBuf;
use std::time::Duration;

mod html;
mod report;

/// Weekly secretary assignment driver.
#[derive(Parser)]
#[command(name = "secplan")]
#[command(about = "Assigns secretaries to the week's work blocks", long_about = None)]
struct Cli {
    /// Monday of the week to process (YYYY-MM-DD)
    #[arg(long)]
    week: String,

    /// Compute and report without inserting into the database
    #[arg(long)]
    dry_run: bool,

    /// Delete existing PROPOSED ALGORITHM assignments before running
    #[arg(long)]
    clear_proposed: bool,

    /// Print detailed model and solver info
    #[arg(long)]
    verbose: bool,

    /// Solver time limit in seconds
    #[arg(long, default_value_t = DEFAULT_TIME_LIMIT_SECS)]
    time_limit: u64,

    /// Write an HTML week view to this path
    #[arg(long)]
    html: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_target(false)
        .compact()
        .init();

    let args = Cli::parse();

    let week_date: NaiveDate = match args.week.parse() {
        Ok(date) => date,
        Err(_) => {
            eprintln!("Erreur: {} n'est pas une date valide (YYYY-MM-DD)", args.week);
            std::process::exit(1);
        }
    };
    let week = match Week::starting(week_date) {
        Ok(week) => week,
        Err(_) => {
            eprintln!("Erreur: {} n'est pas un lundi", args.week);
            eprintln!("Fournissez le lundi de la semaine (ex: 2026-01-05)");
            std::process::exit(1);
        }
    };
    println!("Semaine: {week}");

    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
    let store = secplan_storage::connect(&database_url).await?;

    if args.clear_proposed {
        let deleted = store.clear_proposed(week).await?;
        println!("Nettoyage: {deleted} assignations PROPOSED supprimées");
    }

    println!("Chargement des données...");
    let data = store.load_week_data(week).await?;
    println!(
        "  {} secrétaires, {} besoins (gap>0), {} éligibilités, {} disponibilités",
        data.secretaries.len(),
        data.needs.len(),
        data.eligibility.len(),
        data.availability.len()
    );

    let Some(admin_dept) = data.admin_dept_id else {
        eprintln!("ERREUR: Département 'Administration' non trouvé!");
        eprintln!("Créez le département avant de lancer l'assignation.");
        std::process::exit(1);
    };

    let created = store.create_admin_blocks(week, admin_dept).await?;
    if !created.is_empty() {
        println!("  {} blocs ADMIN créés", created.len());
    }
    let admin_blocks = store.load_admin_blocks(week).await?;
    println!("  {} blocs ADMIN pour la semaine", admin_blocks.len());

    println!("Construction de la carte de disponibilité...");
    let availability = AvailabilityMap::from_rows(&data.availability);
    println!(
        "  {} demi-journées disponibles au total",
        availability.total_slots()
    );

    println!("Construction du modèle CP...");
    let index = NeedIndex::build(&data, &admin_blocks, &availability);
    let model = build_model(
        &data,
        &availability,
        &index,
        &ObjectiveWeights::default(),
        Duration::from_secs(args.time_limit),
    );
    let model_stats = model.stats;
    let eligible_counts: Vec<usize> = (0..index.len()).map(|ni| model.eligible_count(ni)).collect();
    if args.verbose {
        println!(
            "  Variables: {} x-vars, {} y-vars, {} auxiliaires",
            model_stats.x_vars, model_stats.y_vars, model_stats.aux_vars
        );
        println!(
            "  Besoins: {} médicaux, {} admin",
            model_stats.medical_needs, model_stats.admin_needs
        );
        println!(
            "  Termes objectif: {} (dont {} EVITER)",
            model_stats.objective_terms, model_stats.eviter_terms
        );
    }

    println!("Résolution (time limit: {}s)...", args.time_limit);
    let outcome = solve(model, &data, &index);
    if args.verbose {
        if let Some(search) = outcome.search {
            println!(
                "  Recherche: {} propagations, {} noeuds",
                search.propagations, search.nodes
            );
        }
    }

    print!("{}", report::render_report(&data, &outcome, &availability));
    if args.verbose {
        print!("{}", report::render_need_diagnostics(&index, &eligible_counts));
    }

    if let Some(path) = &args.html {
        let doctors = store.load_doctor_view_rows(week).await?;
        let page = html::render_week(week, &data, &doctors, &outcome);
        std::fs::write(path, page)
            .with_context(|| format!("cannot write HTML view to {}", path.display()))?;
        println!("Vue semaine écrite: {}", path.display());
    }

    if outcome.status.is_solution() {
        let mut all = outcome.assignments.clone();
        all.extend(outcome.admin_assignments.iter().cloned());

        if args.dry_run {
            println!(
                "{} {} assignations NON insérées",
                "[DRY RUN]".yellow(),
                all.len()
            );
        } else {
            let inserted = store.write_assignments(&all).await?;
            println!("{inserted} assignations insérées en base (source=ALGORITHM, status=PROPOSED)");
        }
    } else {
        println!(
            "{} (status={})",
            "Pas de solution trouvée".red(),
            outcome.status
        );
    }

    Ok(())
}
