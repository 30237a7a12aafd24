use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::{fmt, EnvFilter};

mod actions;
mod content;
mod host;
mod html;
mod progress;
mod server;
mod toc;
mod types;
mod urls;
mod view;

use host::{CourseSnapshot, SectionRepository};
use types::{PageRequest, Viewer};
use view::PageAction;

#[derive(Parser, Debug)]
#[command(name = "sommario")]
#[command(about = "Render course sections as a web view")]
struct Args {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Path to the course snapshot JSON file
    #[arg(short, long, default_value = "course.json", global = true)]
    course: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", global = true)]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the web server (default)
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "8080")]
        port: u16,

        /// View the course as an editor instead of a student
        #[arg(long)]
        editor: bool,
    },

    /// Render the course landing page to static HTML (no server)
    Build {
        /// Output file
        #[arg(short, long, default_value = "index.html")]
        output: PathBuf,
    },

    /// Load a course snapshot and log its sections
    Inspect,
}

fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level))
        .add_directive("hyper=warn".parse().unwrap())
        .add_directive("tower_http=warn".parse().unwrap());

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_max_level(Level::TRACE)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    init_tracing(&args.log_level);

    match args.command {
        // Default to serve if no command specified
        None => {
            server::serve(8080, args.course, Viewer::student()).await?;
        }
        Some(Commands::Serve { port, editor }) => {
            let viewer = if editor {
                Viewer::editor()
            } else {
                Viewer::student()
            };
            server::serve(port, args.course, viewer).await?;
        }
        Some(Commands::Build { output }) => {
            let snapshot = CourseSnapshot::from_path(&args.course)?;
            let sesskey = uuid::Uuid::new_v4().simple().to_string();
            let action = content::build_page(
                &snapshot,
                &Viewer::student(),
                &PageRequest::default(),
                &sesskey,
            );
            match action {
                PageAction::Render(page) => {
                    html::generate_html(&page, &output)?;
                    info!(path = %output.display(), "HTML saved");
                }
                other => anyhow::bail!("landing render produced a redirect: {other:?}"),
            }
        }
        Some(Commands::Inspect) => {
            let snapshot = CourseSnapshot::from_path(&args.course)?;
            info!(
                course = %snapshot.course.shortname,
                sections = snapshot.sections.len(),
                "Loaded course snapshot"
            );
            for section in snapshot.sections() {
                let progress = progress::section_progress(section, &snapshot, &snapshot);
                info!(
                    number = section.number,
                    name = %toc::section_name(section),
                    visible = section.visible,
                    activities = snapshot.activities_in(section.number).len(),
                    complete = progress.map(|p| p.complete),
                    total = progress.map(|p| p.total),
                    "Section"
                );
            }
        }
    }

    Ok(())
}
