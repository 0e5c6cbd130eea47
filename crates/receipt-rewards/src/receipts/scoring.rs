use serde::Serialize;

use super::domain::Receipt;

/// How often the purchase-day and afternoon bonuses are granted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReceiptBonusMode {
    /// Once for the whole receipt.
    #[default]
    PerReceipt,
    /// Once for every item on the receipt, matching the legacy service's totals.
    PerItem,
}

impl ReceiptBonusMode {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "per-receipt" | "per_receipt" | "receipt" => Some(Self::PerReceipt),
            "per-item" | "per_item" | "item" => Some(Self::PerItem),
            _ => None,
        }
    }

    fn multiplier(self, item_count: usize) -> u64 {
        match self {
            ReceiptBonusMode::PerReceipt => 1,
            ReceiptBonusMode::PerItem => item_count as u64,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScoringConfig {
    pub bonus_mode: ReceiptBonusMode,
}

const ROUND_DOLLAR_POINTS: u64 = 50;
const QUARTER_MULTIPLE_POINTS: u64 = 25;
const ITEM_PAIR_POINTS: u64 = 5;
const ODD_DAY_POINTS: u64 = 6;
const AFTERNOON_POINTS: u64 = 10;
const AFTERNOON_HOURS: std::ops::Range<u32> = 14..16;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringRule {
    RoundDollarTotal,
    QuarterMultipleTotal,
    RetailerAlphanumeric,
    ItemPairs,
    DescriptionLength,
    OddPurchaseDay,
    AfternoonPurchase,
}

impl ScoringRule {
    pub fn label(&self) -> &'static str {
        match self {
            ScoringRule::RoundDollarTotal => "Round dollar total",
            ScoringRule::QuarterMultipleTotal => "Total is a multiple of 0.25",
            ScoringRule::RetailerAlphanumeric => "Retailer alphanumeric characters",
            ScoringRule::ItemPairs => "Every two items",
            ScoringRule::DescriptionLength => "Description length multiple of 3",
            ScoringRule::OddPurchaseDay => "Odd purchase day",
            ScoringRule::AfternoonPurchase => "Purchased between 14:00 and 16:00",
        }
    }
}

/// Discrete contribution to a receipt's points.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoreComponent {
    pub rule: ScoringRule,
    pub points: u64,
    pub notes: String,
}

/// Point total along with the rules that produced it. Rules that awarded nothing are omitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoreCard {
    pub total: u64,
    pub components: Vec<ScoreComponent>,
}

impl ScoreCard {
    fn award(&mut self, rule: ScoringRule, points: u64, notes: String) {
        if points == 0 {
            return;
        }
        self.total = self.total.saturating_add(points);
        self.components.push(ScoreComponent {
            rule,
            points,
            notes,
        });
    }

    pub fn points_for(&self, rule: ScoringRule) -> u64 {
        self.components
            .iter()
            .filter(|component| component.rule == rule)
            .fold(0, |sum: u64, component| sum.saturating_add(component.points))
    }
}

/// Stateless engine turning a validated receipt into reward points.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScoringEngine {
    config: ScoringConfig,
}

impl ScoringEngine {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    pub fn score(&self, receipt: &Receipt) -> u64 {
        self.breakdown(receipt).total
    }

    pub fn breakdown(&self, receipt: &Receipt) -> ScoreCard {
        let mut card = ScoreCard {
            total: 0,
            components: Vec::new(),
        };
        let total = receipt.total();

        if total.is_round_dollar() {
            card.award(
                ScoringRule::RoundDollarTotal,
                ROUND_DOLLAR_POINTS,
                format!("total {total} has no cents"),
            );
        }

        if total.is_multiple_of_quarter() {
            card.award(
                ScoringRule::QuarterMultipleTotal,
                QUARTER_MULTIPLE_POINTS,
                format!("total {total} is a multiple of 0.25"),
            );
        }

        let alphanumeric = receipt
            .retailer()
            .chars()
            .filter(char::is_ascii_alphanumeric)
            .count() as u64;
        card.award(
            ScoringRule::RetailerAlphanumeric,
            alphanumeric,
            format!("{alphanumeric} alphanumeric characters in '{}'", receipt.retailer()),
        );

        let item_count = receipt.items().len();
        let pairs = (item_count / 2) as u64;
        card.award(
            ScoringRule::ItemPairs,
            pairs.saturating_mul(ITEM_PAIR_POINTS),
            format!("{pairs} pair(s) across {item_count} item(s)"),
        );

        for item in receipt.items() {
            if item.trimmed_description_len() % 3 == 0 {
                card.award(
                    ScoringRule::DescriptionLength,
                    item.price().fifth_rounded_up(),
                    format!(
                        "'{}' priced {} earns a fifth of its price",
                        item.short_description().trim(),
                        item.price()
                    ),
                );
            }
        }

        let repeats = self.config.bonus_mode.multiplier(item_count);

        let day = receipt.purchase_day();
        if day % 2 == 1 {
            card.award(
                ScoringRule::OddPurchaseDay,
                ODD_DAY_POINTS.saturating_mul(repeats),
                format!("purchase day {day:02} is odd"),
            );
        }

        let hour = receipt.purchase_hour();
        if AFTERNOON_HOURS.contains(&hour) {
            card.award(
                ScoringRule::AfternoonPurchase,
                AFTERNOON_POINTS.saturating_mul(repeats),
                format!("purchased at {}", receipt.purchase_time()),
            );
        }

        card
    }
}
