//! Draft command - map an RxH document to a supplier invoice draft.

use std::fs;
use std::path::PathBuf;

use clap::Args;
use tracing::info;

use rxh_core::{draft_from_xml, DraftOptions, InMemoryPartners, RxhExtractor};

/// Arguments for the draft command.
#[derive(Args)]
pub struct DraftArgs {
    /// Input XML file
    #[arg(required = true)]
    input: PathBuf,

    /// Account for the invoice line (overrides config)
    #[arg(short, long)]
    account: Option<String>,

    /// JSON file with known partners (overrides config)
    #[arg(short, long)]
    partners: Option<PathBuf>,

    /// Propose a new supplier if its RUC is not among the partners
    #[arg(long)]
    create_supplier: bool,
}

pub async fn run(args: DraftArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = super::load_config(config_path)?;

    let account = args
        .account
        .or(config.draft.account)
        .ok_or_else(|| anyhow::anyhow!("No account given. Use --account or set draft.account"))?;

    let partners = match args.partners.or(config.draft.partners_file) {
        Some(path) => {
            info!("Loading partners from {}", path.display());
            InMemoryPartners::from_file(&path)?
        }
        None => InMemoryPartners::default(),
    };

    let data = fs::read(&args.input)?;
    let extractor = RxhExtractor::with_config(config.extraction);
    let options = DraftOptions {
        create_supplier: args.create_supplier || config.draft.create_supplier,
        account,
    };
    let draft = draft_from_xml(&extractor, &data, &partners, &options)?;

    println!("{}", serde_json::to_string_pretty(&draft)?);

    Ok(())
}
