//! Typed dashboard rows and per-widget query presets.
//!
//! Live feeds deliver loose JSON (see [`crate::source::HttpSource`]). Rows
//! produced in-process are typed and converted with [`IntoRecord`].

use chrono::{DateTime, Utc};
use derive_more::Display;
use edgeboard_export::ExportField;
use edgeboard_pipeline::{Query, Record, SortKey};
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

/// Conversion of a typed row into a pipeline [`Record`].
pub trait IntoRecord {
    fn into_record(self) -> Record;
}

/// Convert a batch of rows.
pub fn into_records<I>(rows: I) -> Vec<Record>
where
    I: IntoIterator,
    I::Item: IntoRecord,
{
    rows.into_iter().map(IntoRecord::into_record).collect()
}

/// Risk-free opportunity across two or more books.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ArbitrageOpportunity {
    pub id: SmolStr,
    pub sport: SmolStr,
    /// Matchup, e.g. "Yankees @ Red Sox"
    pub event: String,
    pub market_type: SmolStr,
    /// Books involved, joined for display
    pub sportsbooks: Vec<SmolStr>,
    /// Return on total stake, in percent
    pub roi: f64,
    /// Guaranteed profit in currency units
    pub profit: f64,
    pub total_stake: f64,
    pub confidence: f64,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
}

impl IntoRecord for ArbitrageOpportunity {
    fn into_record(self) -> Record {
        let mut record = Record::new(self.id)
            .with("sport", self.sport)
            .with("event", self.event)
            .with("market_type", self.market_type)
            .with("sportsbooks", self.sportsbooks.join(", "))
            .with("roi", self.roi)
            .with("profit", self.profit)
            .with("total_stake", self.total_stake)
            .with("confidence", self.confidence);
        if let Some(expires_at) = self.expires_at {
            record.insert("expires_at", expires_at.to_rfc3339());
        }
        record
    }
}

/// One feature's SHAP contribution to a prediction.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct FeatureContribution {
    pub feature: SmolStr,
    /// Observed feature value
    pub value: f64,
    pub shap_value: f64,
    #[serde(default)]
    pub category: Option<SmolStr>,
}

impl FeatureContribution {
    /// Magnitude of the contribution regardless of sign.
    pub fn importance(&self) -> f64 {
        self.shap_value.abs()
    }

    pub fn direction(&self) -> &'static str {
        if self.shap_value >= 0.0 { "positive" } else { "negative" }
    }
}

impl IntoRecord for FeatureContribution {
    fn into_record(self) -> Record {
        let importance = self.importance();
        let direction = self.direction();
        let mut record = Record::new(self.feature.clone())
            .with("feature", self.feature)
            .with("value", self.value)
            .with("shap_value", self.shap_value)
            .with("importance", importance)
            .with("direction", direction);
        if let Some(category) = self.category {
            record.insert("category", category);
        }
        record
    }
}

/// An auto-pilot betting rule and its track record.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct BettingRule {
    pub id: SmolStr,
    pub name: String,
    pub sport: SmolStr,
    /// Minimum edge, in percent, required to place a bet
    pub min_edge: f64,
    pub max_stake: f64,
    pub enabled: bool,
    pub win_rate: f64,
    pub roi: f64,
    pub bets_placed: u32,
}

impl IntoRecord for BettingRule {
    fn into_record(self) -> Record {
        Record::new(self.id)
            .with("name", self.name)
            .with("sport", self.sport)
            .with("min_edge", self.min_edge)
            .with("max_stake", self.max_stake)
            .with("enabled", self.enabled)
            .with("win_rate", self.win_rate)
            .with("roi", self.roi)
            .with("bets_placed", self.bets_placed)
    }
}

/// Evaluation metrics of one prediction model.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ModelMetric {
    pub model: SmolStr,
    pub sport: SmolStr,
    pub accuracy: f64,
    pub precision: f64,
    pub recall: f64,
    pub f1_score: f64,
    pub roi: f64,
    pub predictions: u32,
}

impl IntoRecord for ModelMetric {
    fn into_record(self) -> Record {
        Record::new(format!("{}:{}", self.model, self.sport))
            .with("model", self.model)
            .with("sport", self.sport)
            .with("accuracy", self.accuracy)
            .with("precision", self.precision)
            .with("recall", self.recall)
            .with("f1_score", self.f1_score)
            .with("roi", self.roi)
            .with("predictions", self.predictions)
    }
}

/// A model pick on a single market.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Prediction {
    pub id: SmolStr,
    pub sport: SmolStr,
    pub game: String,
    pub market: SmolStr,
    /// e.g. "over", "under", "home"
    pub recommendation: SmolStr,
    #[serde(default)]
    pub line: Option<f64>,
    /// American odds
    pub odds: f64,
    pub confidence: f64,
    /// Expected value per unit staked
    pub ev: f64,
}

impl IntoRecord for Prediction {
    fn into_record(self) -> Record {
        let mut record = Record::new(self.id)
            .with("sport", self.sport)
            .with("game", self.game)
            .with("market", self.market)
            .with("recommendation", self.recommendation)
            .with("odds", self.odds)
            .with("confidence", self.confidence)
            .with("ev", self.ev);
        if let Some(line) = self.line {
            record.insert("line", line);
        }
        record
    }
}

/// The dashboard widgets sharing the record pipeline.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Display, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WidgetKind {
    #[display("arbitrage_scanner")]
    ArbitrageScanner,
    #[display("shap_browser")]
    ShapBrowser,
    #[display("auto_pilot")]
    AutoPilot,
    #[display("model_grid")]
    ModelGrid,
    #[display("predictions")]
    Predictions,
}

impl WidgetKind {
    pub const ALL: [WidgetKind; 5] = [
        WidgetKind::ArbitrageScanner,
        WidgetKind::ShapBrowser,
        WidgetKind::AutoPilot,
        WidgetKind::ModelGrid,
        WidgetKind::Predictions,
    ];

    /// The query a widget opens with before the user changes anything.
    pub fn default_query(&self) -> Query {
        match self {
            WidgetKind::ArbitrageScanner => Query::new()
                .sort_by(SortKey::descending("roi"))
                .summarize("profit")
                .facet("sport"),
            WidgetKind::ShapBrowser => Query::new()
                .sort_by(SortKey::descending("importance"))
                .summarize("shap_value")
                .facet("direction"),
            WidgetKind::AutoPilot => Query::new()
                .sort_by(SortKey::descending("roi"))
                .summarize("bets_placed")
                .facet("sport"),
            WidgetKind::ModelGrid => Query::new()
                .sort_by(SortKey::descending("accuracy"))
                .summarize("predictions")
                .facet("sport"),
            WidgetKind::Predictions => Query::new()
                .sort_by(SortKey::descending("ev"))
                .summarize("ev")
                .facet("sport")
                .facet("recommendation"),
        }
    }

    /// Fields offered in the widget's export dialog, in column order.
    pub fn export_fields(&self) -> Vec<ExportField> {
        match self {
            WidgetKind::ArbitrageScanner => vec![
                ExportField::text("sport", "Sport"),
                ExportField::text("event", "Event"),
                ExportField::text("market_type", "Market"),
                ExportField::text("sportsbooks", "Sportsbooks"),
                ExportField::number("roi", "ROI %"),
                ExportField::number("profit", "Profit"),
                ExportField::number("total_stake", "Total Stake"),
                ExportField::number("confidence", "Confidence"),
                ExportField::date("expires_at", "Expires"),
            ],
            WidgetKind::ShapBrowser => vec![
                ExportField::text("feature", "Feature"),
                ExportField::text("category", "Category"),
                ExportField::number("value", "Value"),
                ExportField::number("shap_value", "SHAP Value"),
                ExportField::number("importance", "Importance"),
                ExportField::text("direction", "Direction"),
            ],
            WidgetKind::AutoPilot => vec![
                ExportField::text("name", "Rule"),
                ExportField::text("sport", "Sport"),
                ExportField::number("min_edge", "Min Edge %"),
                ExportField::number("max_stake", "Max Stake"),
                ExportField::boolean("enabled", "Enabled"),
                ExportField::number("win_rate", "Win Rate"),
                ExportField::number("roi", "ROI %"),
                ExportField::number("bets_placed", "Bets Placed"),
            ],
            WidgetKind::ModelGrid => vec![
                ExportField::text("model", "Model"),
                ExportField::text("sport", "Sport"),
                ExportField::number("accuracy", "Accuracy"),
                ExportField::number("precision", "Precision"),
                ExportField::number("recall", "Recall"),
                ExportField::number("f1_score", "F1"),
                ExportField::number("roi", "ROI %"),
                ExportField::number("predictions", "Predictions"),
            ],
            WidgetKind::Predictions => vec![
                ExportField::text("sport", "Sport"),
                ExportField::text("game", "Game"),
                ExportField::text("market", "Market"),
                ExportField::text("recommendation", "Pick"),
                ExportField::number("line", "Line"),
                ExportField::number("odds", "Odds"),
                ExportField::number("confidence", "Confidence"),
                ExportField::number("ev", "EV"),
            ],
        }
    }
}
