//! View projections of the assembled table.

use crate::error::Result;
use hobart_data::schema;
use hobart_data::types::AssetFamily;
use polars::prelude::*;
use std::fs;
use std::path::Path;

/// The three views a pipeline run produces, all indexed by ticker.
///
/// Light holds the profile columns for compact listings, table the
/// screener columns including composite scores, full everything the
/// assembly produced.
#[derive(Debug, Clone)]
pub struct AssetViews {
    /// Minimal display view.
    pub light: DataFrame,
    /// Detailed tabular view.
    pub table: DataFrame,
    /// Full internal view.
    pub full: DataFrame,
}

fn project(frame: &DataFrame, wanted: &[&str]) -> Result<DataFrame> {
    let present: Vec<&str> = wanted
        .iter()
        .copied()
        .filter(|name| frame.column(name).is_ok())
        .collect();
    Ok(frame.select(present)?)
}

/// Split the assembled wide table into its three views.
///
/// View column lists are projections onto whatever the table actually
/// carries; a family that never produces a column simply goes without it.
pub fn split_views(full: &DataFrame) -> Result<AssetViews> {
    Ok(AssetViews {
        light: project(full, schema::LIGHT_COLUMNS)?,
        table: project(full, schema::TABLE_COLUMNS)?,
        full: full.clone(),
    })
}

/// Write the three views of a family as CSV files under `dir`.
pub fn write_views(views: &AssetViews, dir: &Path, family: AssetFamily) -> Result<()> {
    fs::create_dir_all(dir)?;
    for (stem, frame) in [
        ("light", &views.light),
        ("table", &views.table),
        ("full", &views.full),
    ] {
        let path = dir.join(format!("{}_{}.csv", family.as_str(), stem));
        let mut file = fs::File::create(path)?;
        let mut frame = frame.clone();
        CsvWriter::new(&mut file)
            .include_header(true)
            .finish(&mut frame)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assembled() -> DataFrame {
        df! {
            schema::TICKER => &["AAPL", "MSFT"],
            schema::NAME => &["Apple", "Microsoft"],
            schema::SECTOR => &["Technology", "Technology"],
            schema::MARKET_CAP_USD => &[Some(3.0e12), Some(2.8e12)],
            schema::CAGR => &[Some(0.1), Some(0.2)],
            schema::SCORE_OVERALL => &[Some(0.5), Some(1.0)],
            "cagr_SECT" => &[Some(0.5), Some(1.0)],
        }
        .unwrap()
    }

    #[test]
    fn test_split_views_projects_available_columns() {
        let views = split_views(&assembled()).unwrap();

        assert!(views.light.column(schema::TICKER).is_ok());
        assert!(views.light.column(schema::NAME).is_ok());
        // Fund-only column absent from the input stays absent.
        assert!(views.light.column(schema::NET_ASSETS_USD).is_err());
        // Suffixed rank columns belong to the full view only.
        assert!(views.light.column("cagr_SECT").is_err());
        assert!(views.table.column(schema::SCORE_OVERALL).is_ok());
        assert!(views.table.column("cagr_SECT").is_err());
        assert!(views.full.column("cagr_SECT").is_ok());
    }

    #[test]
    fn test_views_share_row_count() {
        let views = split_views(&assembled()).unwrap();
        assert_eq!(views.light.height(), 2);
        assert_eq!(views.table.height(), 2);
        assert_eq!(views.full.height(), 2);
    }

    #[test]
    fn test_write_views() {
        let dir = std::env::temp_dir().join(format!("hobart_views_{}", std::process::id()));
        fs::remove_dir_all(&dir).ok();

        let views = split_views(&assembled()).unwrap();
        write_views(&views, &dir, AssetFamily::Equities).unwrap();

        for stem in ["light", "table", "full"] {
            assert!(dir.join(format!("equities_{stem}.csv")).exists());
        }

        fs::remove_dir_all(&dir).ok();
    }
}
