use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "argonaut",
    about = "Argonaut — typed scheduling constraints for Argo workflows",
    version,
    propagate_version = true,
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Materialize an affinity file and print the wire JSON.
    ///
    /// Prints `null` when the file describes no constraints.
    Render {
        /// Path to the affinity TOML file
        #[arg(short, long)]
        file: String,
        /// Single-line output instead of pretty-printed JSON
        #[arg(long)]
        compact: bool,
    },
    /// Submit a workflow manifest, optionally attaching an affinity.
    Submit {
        /// Path to argonaut.toml
        #[arg(short, long, default_value = "argonaut.toml")]
        config: String,
        /// Path to the workflow manifest (JSON)
        #[arg(short, long)]
        workflow: String,
        /// Affinity TOML file to attach to the workflow spec
        #[arg(short, long)]
        affinity: Option<String>,
        /// Target namespace (default: namespace from config)
        #[arg(short, long)]
        namespace: Option<String>,
    },
    /// Delete a workflow by name.
    Delete {
        #[arg(short, long, default_value = "argonaut.toml")]
        config: String,
        #[arg(long)]
        name: String,
    },
    /// Print the Argo UI link for a workflow.
    Link {
        #[arg(short, long, default_value = "argonaut.toml")]
        config: String,
        #[arg(long)]
        name: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("argonaut=info".parse()?)
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Render { file, compact } => commands::render::render(&file, compact),
        Commands::Submit { config, workflow, affinity, namespace } => {
            commands::workflow::submit(&config, &workflow, affinity.as_deref(), namespace.as_deref()).await
        }
        Commands::Delete { config, name } => commands::workflow::delete(&config, &name).await,
        Commands::Link { config, name } => commands::workflow::link(&config, &name),
    }
}
