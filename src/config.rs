//! Layout configuration.
//!
//! A `LayoutConfig` captures everything one document layout family needs:
//! the canonical schema, fragment arity, header tokens, the identifier
//! pattern for section detection, metadata regions, and the derived-column
//! wiring. Configurations are selected by the caller, never inferred at
//! runtime by trial-and-error re-extraction.

use crate::error::{Error, Result};
use crate::schema::{CanonicalSchema, ColumnKind};
use regex::Regex;

/// A rectangular bounding box in page coordinates, `(top, left, bottom,
/// right)` in points, tied to a 1-based page number.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Region {
    /// 1-based page number
    pub page: u32,
    /// Top edge
    pub top: f32,
    /// Left edge
    pub left: f32,
    /// Bottom edge
    pub bottom: f32,
    /// Right edge
    pub right: f32,
}

impl Region {
    /// Create a region.
    pub fn new(page: u32, top: f32, left: f32, bottom: f32, right: f32) -> Self {
        Self {
            page,
            top,
            left,
            bottom,
            right,
        }
    }

    /// Whether a point on a page falls inside this region.
    pub fn contains(&self, page: u32, x: f32, y: f32) -> bool {
        page == self.page
            && x >= self.left
            && x <= self.right
            && y >= self.top
            && y <= self.bottom
    }
}

/// Minimum-arity rule applied by the fragment filter.
///
/// The rule is explicit because known layout families disagree: one accepts
/// any fragment wider than half the data columns, another demands the exact
/// extracted width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArityRule {
    /// Accept fragments at least this wide
    AtLeast(usize),
    /// Accept fragments of exactly this width
    Exactly(usize),
}

impl ArityRule {
    /// Whether a fragment of the given width passes.
    pub fn accepts(&self, width: usize) -> bool {
        match *self {
            ArityRule::AtLeast(min) => width >= min,
            ArityRule::Exactly(n) => width == n,
        }
    }
}

/// Optional unit-weight backfill applied after projection.
///
/// When the weight column does not already carry the unit token, the first
/// `\d*\s*TOKEN` match in the description column is copied in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeightBackfill {
    /// Column to fill (must be a text column in the extracted range)
    pub weight_column: String,
    /// Column searched for the weight (extracted range)
    pub desc_column: String,
    /// Unit token, e.g. `LB`
    pub unit_token: String,
}

impl WeightBackfill {
    /// Backfill `weight_column` from `desc_column` using the `LB` token.
    pub fn pounds(weight_column: impl Into<String>, desc_column: impl Into<String>) -> Self {
        Self {
            weight_column: weight_column.into(),
            desc_column: desc_column.into(),
            unit_token: "LB".into(),
        }
    }
}

/// Configuration for one document layout family.
#[derive(Debug, Clone)]
pub struct LayoutConfig {
    /// Canonical output schema
    pub schema: CanonicalSchema,

    /// Number of leading schema columns populated positionally from
    /// fragment cells; the remaining columns are derived
    pub extracted_arity: usize,

    /// Fragment filter rule
    pub arity_rule: ArityRule,

    /// Header tokens matched, in order, against the leading cells of a row
    pub header_tokens: Vec<String>,

    /// Pattern a leading cell must match to count as a record identifier;
    /// non-matching leading cells mark section rows
    pub id_pattern: String,

    /// Derived column receiving the propagated section value
    pub section_column: Option<String>,

    /// Derived column receiving the extracted plant/location string
    pub location_column: Option<String>,

    /// Derived column receiving the effective date (ISO text)
    pub date_column: Option<String>,

    /// Derived column receiving the provenance tag
    pub source_column: Option<String>,

    /// Literal provenance tag attached to every record
    pub provenance: String,

    /// First-page region scanned for the effective date
    pub date_region: Option<Region>,

    /// First-page region scanned for the plant/location string
    pub location_region: Option<Region>,

    /// Known facility name short-circuiting location extraction
    pub location_literal: Option<String>,

    /// Optional unit-weight backfill
    pub weight_backfill: Option<WeightBackfill>,

    /// Column the final table is sorted by, nulls last
    pub sort_by: Option<String>,
}

impl LayoutConfig {
    /// Create a configuration with no derived columns and an exact-arity
    /// filter matching the schema width.
    pub fn new(schema: CanonicalSchema) -> Self {
        let arity = schema.arity();
        Self {
            schema,
            extracted_arity: arity,
            arity_rule: ArityRule::Exactly(arity),
            header_tokens: Vec::new(),
            id_pattern: r"^\d".into(),
            section_column: None,
            location_column: None,
            date_column: None,
            source_column: None,
            provenance: "pdf".into(),
            date_region: None,
            location_region: None,
            location_literal: None,
            weight_backfill: None,
            sort_by: None,
        }
    }

    /// Set the number of extracted columns.
    pub fn with_extracted_arity(mut self, arity: usize) -> Self {
        self.extracted_arity = arity;
        self
    }

    /// Set the fragment filter rule.
    pub fn with_arity_rule(mut self, rule: ArityRule) -> Self {
        self.arity_rule = rule;
        self
    }

    /// Set the header tokens.
    pub fn with_header_tokens<S: Into<String>>(
        mut self,
        tokens: impl IntoIterator<Item = S>,
    ) -> Self {
        self.header_tokens = tokens.into_iter().map(Into::into).collect();
        self
    }

    /// Set the identifier pattern.
    pub fn with_id_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.id_pattern = pattern.into();
        self
    }

    /// Name the derived section column.
    pub fn with_section_column(mut self, name: impl Into<String>) -> Self {
        self.section_column = Some(name.into());
        self
    }

    /// Name the derived location column.
    pub fn with_location_column(mut self, name: impl Into<String>) -> Self {
        self.location_column = Some(name.into());
        self
    }

    /// Name the derived date column.
    pub fn with_date_column(mut self, name: impl Into<String>) -> Self {
        self.date_column = Some(name.into());
        self
    }

    /// Name the derived provenance column.
    pub fn with_source_column(mut self, name: impl Into<String>) -> Self {
        self.source_column = Some(name.into());
        self
    }

    /// Set the provenance tag.
    pub fn with_provenance(mut self, tag: impl Into<String>) -> Self {
        self.provenance = tag.into();
        self
    }

    /// Set the effective-date region.
    pub fn with_date_region(mut self, region: Region) -> Self {
        self.date_region = Some(region);
        self
    }

    /// Set the location region.
    pub fn with_location_region(mut self, region: Region) -> Self {
        self.location_region = Some(region);
        self
    }

    /// Set the known facility name.
    pub fn with_location_literal(mut self, literal: impl Into<String>) -> Self {
        self.location_literal = Some(literal.into());
        self
    }

    /// Enable unit-weight backfill.
    pub fn with_weight_backfill(mut self, backfill: WeightBackfill) -> Self {
        self.weight_backfill = Some(backfill);
        self
    }

    /// Sort the final table by a column.
    pub fn with_sort_by(mut self, column: impl Into<String>) -> Self {
        self.sort_by = Some(column.into());
        self
    }

    /// Validate internal consistency. Called by the pipeline constructor.
    pub fn validate(&self) -> Result<()> {
        if self.schema.arity() == 0 {
            return Err(Error::InvalidConfig("schema has no columns".into()));
        }
        if self.extracted_arity == 0 || self.extracted_arity > self.schema.arity() {
            return Err(Error::InvalidConfig(format!(
                "extracted arity {} out of range for schema of {} columns",
                self.extracted_arity,
                self.schema.arity()
            )));
        }
        if self.header_tokens.len() > self.extracted_arity {
            return Err(Error::InvalidConfig(format!(
                "{} header tokens exceed extracted arity {}",
                self.header_tokens.len(),
                self.extracted_arity
            )));
        }
        Regex::new(&self.id_pattern)
            .map_err(|e| Error::InvalidConfig(format!("bad identifier pattern: {e}")))?;

        for (label, name) in [
            ("section", &self.section_column),
            ("location", &self.location_column),
            ("date", &self.date_column),
            ("source", &self.source_column),
        ] {
            if let Some(name) = name {
                let position = self.schema.position(name).ok_or_else(|| {
                    Error::InvalidConfig(format!("{label} column '{name}' not in schema"))
                })?;
                if position < self.extracted_arity {
                    return Err(Error::InvalidConfig(format!(
                        "{label} column '{name}' collides with extracted column {position}"
                    )));
                }
            }
        }

        if let Some(backfill) = &self.weight_backfill {
            for name in [&backfill.weight_column, &backfill.desc_column] {
                match self.schema.position(name) {
                    None => {
                        return Err(Error::InvalidConfig(format!(
                            "backfill column '{name}' not in schema"
                        )))
                    }
                    Some(position) if position >= self.extracted_arity => {
                        return Err(Error::InvalidConfig(format!(
                            "backfill column '{name}' is not an extracted column"
                        )))
                    }
                    Some(position) => {
                        if name == &backfill.weight_column
                            && self.schema.kind_of(position) != Some(ColumnKind::Text)
                        {
                            return Err(Error::InvalidConfig(format!(
                                "backfill target '{name}' must be a text column"
                            )));
                        }
                    }
                }
            }
        }

        if let Some(name) = &self.sort_by {
            if !self.schema.contains(name) {
                return Err(Error::InvalidConfig(format!(
                    "sort column '{name}' not in schema"
                )));
            }
        }

        Ok(())
    }

    /// Layout family for vertical price sheets.
    ///
    /// Section banners (species names) are interleaved in the data stream;
    /// fragments narrower than half the data columns are decorative noise.
    pub fn vertical() -> Self {
        Self::new(price_sheet_schema())
            .with_extracted_arity(16)
            .with_arity_rule(ArityRule::AtLeast(6))
            .with_header_tokens(["PRODUCT", "FORMULA"])
            .with_section_column("species")
            .with_location_column("plant_location")
            .with_date_column("date_inserted")
            .with_source_column("source")
            .with_date_region(Region::new(1, 54.0, 10.0, 82.0, 254.0))
            .with_location_region(Region::new(1, 0.0, 500.0, 40.0, 700.0))
            .with_weight_backfill(WeightBackfill::pounds("unit_weight", "product_desc"))
    }

    /// Layout family for horizontal (landscape) price sheets.
    ///
    /// Every data fragment is exactly 16 columns wide; there are no section
    /// banners, and the facility name is a known literal.
    pub fn horizontal() -> Self {
        Self::new(price_sheet_schema())
            .with_extracted_arity(16)
            .with_arity_rule(ArityRule::Exactly(16))
            .with_header_tokens(["PRODUCT", "FORMULA"])
            .with_section_column("species")
            .with_location_column("plant_location")
            .with_date_column("date_inserted")
            .with_source_column("source")
            .with_date_region(Region::new(1, 60.0, 100.0, 80.0, 350.0))
            .with_location_region(Region::new(1, 10.0, 400.0, 40.0, 700.0))
            .with_location_literal("HUDSON'S")
            .with_sort_by("product_number")
    }
}

/// The canonical 20-column price-sheet schema shared by both layout
/// families: 16 extracted columns followed by 4 derived ones.
fn price_sheet_schema() -> CanonicalSchema {
    CanonicalSchema::new()
        .text("product_number")
        .text("formula_code")
        .text("product_desc")
        .text("product_form")
        .text("unit_weight")
        .text("pallet_quantity")
        .text("stocking_status")
        .text("min_order_quantity")
        .text("days_lead_time")
        .text("fob_or_dlv")
        .numeric("change_in_price")
        .numeric("list_price")
        .numeric("full_pallet_price")
        .numeric("half_load_full_pallet_price")
        .numeric("full_load_full_pallet_price")
        .numeric("full_load_best_price")
        .text("species")
        .text("plant_location")
        .text("date_inserted")
        .text("source")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arity_rule() {
        assert!(ArityRule::AtLeast(6).accepts(6));
        assert!(ArityRule::AtLeast(6).accepts(16));
        assert!(!ArityRule::AtLeast(6).accepts(5));
        assert!(ArityRule::Exactly(16).accepts(16));
        assert!(!ArityRule::Exactly(16).accepts(17));
    }

    #[test]
    fn test_region_contains() {
        let region = Region::new(1, 54.0, 10.0, 82.0, 254.0);
        assert!(region.contains(1, 100.0, 60.0));
        assert!(!region.contains(2, 100.0, 60.0));
        assert!(!region.contains(1, 300.0, 60.0));
        assert!(!region.contains(1, 100.0, 90.0));
    }

    #[test]
    fn test_presets_validate() {
        LayoutConfig::vertical().validate().unwrap();
        LayoutConfig::horizontal().validate().unwrap();
    }

    #[test]
    fn test_preset_shape() {
        let config = LayoutConfig::vertical();
        assert_eq!(config.schema.arity(), 20);
        assert_eq!(config.extracted_arity, 16);
        assert_eq!(config.schema.position("species"), Some(16));
        assert_eq!(config.schema.position("source"), Some(19));
    }

    #[test]
    fn test_validate_rejects_colliding_derived_column() {
        let schema = CanonicalSchema::new().text("id").text("section");
        let config = LayoutConfig::new(schema)
            .with_extracted_arity(2)
            .with_section_column("section");
        assert!(matches!(
            config.validate(),
            Err(crate::error::Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_validate_rejects_unknown_sort_column() {
        let schema = CanonicalSchema::new().text("id");
        let config = LayoutConfig::new(schema).with_sort_by("missing");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_pattern() {
        let schema = CanonicalSchema::new().text("id");
        let config = LayoutConfig::new(schema).with_id_pattern("(unclosed");
        assert!(config.validate().is_err());
    }
}
