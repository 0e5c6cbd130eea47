use clap::Args;
use receipt_rewards::config::{AppConfig, ConfigError, ReceiptsConfig};
use receipt_rewards::error::AppError;
use receipt_rewards::receipts::{
    DateValidation, Receipt, ReceiptBonusMode, ReceiptSubmission, ScoreCard, ScoringEngine,
    Validator,
};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// Path to a receipt JSON document
    pub(crate) path: PathBuf,
    /// Grant day/time bonuses `per-receipt` or `per-item` (overrides RECEIPTS_BONUS_MODE)
    #[arg(long)]
    pub(crate) bonus_mode: Option<String>,
    /// Require purchase dates to be real calendar dates
    #[arg(long)]
    pub(crate) strict_dates: bool,
}

pub(crate) fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let ScoreArgs {
        path,
        bonus_mode,
        strict_dates,
    } = args;

    let mut config = AppConfig::load()?.receipts;
    if let Some(raw) = bonus_mode {
        config.bonus_mode =
            ReceiptBonusMode::parse(&raw).ok_or(ConfigError::InvalidBonusMode { value: raw })?;
    }
    if strict_dates {
        config.date_validation = DateValidation::Strict;
    }

    let (receipt, card) = score_file(&path, &config)?;
    render_score_card(&path, &receipt, &card);
    Ok(())
}

pub(crate) fn score_file(
    path: &Path,
    config: &ReceiptsConfig,
) -> Result<(Receipt, ScoreCard), AppError> {
    let raw = fs::read_to_string(path)?;
    let submission: ReceiptSubmission = serde_json::from_str(&raw)?;

    let receipt = Validator::new(config.validation()).validate(submission)?;
    let card = ScoringEngine::new(config.scoring()).breakdown(&receipt);
    Ok((receipt, card))
}

fn render_score_card(path: &Path, receipt: &Receipt, card: &ScoreCard) {
    println!("Receipt {}", path.display());
    println!(
        "{} on {} at {}: {} item(s), total {}",
        receipt.retailer(),
        receipt.purchase_date(),
        receipt.purchase_time(),
        receipt.items().len(),
        receipt.total()
    );

    if card.components.is_empty() {
        println!("\nNo rules awarded points");
    } else {
        println!("\nPoints by rule");
        for component in &card.components {
            println!(
                "- {}: {} ({})",
                component.rule.label(),
                component.points,
                component.notes
            );
        }
    }

    println!("\nTotal: {} points", card.total);
}
