//! Faceted Scatter Example
//!
//! Splits one dataset into small multiples by a categorical column and
//! writes the figure as SVG.
//!
//! Run with: `cargo run --example facet_scatter`

use trueno_facet::prelude::*;

fn main() {
    println!("Faceted Scatter Example");
    println!("=======================\n");

    // Step 1: Build a frame with a categorical column
    println!("Step 1: Preparing sample data...");
    let df = sample_frame();
    println!("  {} rows, columns {:?}", df.nrow(), df.columns());

    // Step 2: Facet by site, sharing axes across the whole grid
    println!("\nStep 2: Configuring facets...");
    let opts = FacetOptions::new()
        .sharex(ShareMode::All)
        .sharey(ShareMode::Row)
        .xlabel("hour")
        .ylabel("temperature");
    let facet = Facet::from_frame(&df, &["site"], &["hour", "temp"], opts).expect("Failed to facet frame");
    let shape = facet.shape();
    println!("  {} facets in a {}x{} grid", facet.facet_count(), shape.nrows, shape.ncols);

    // Step 3: Draw each group on its panel
    println!("\nStep 3: Drawing panels...");
    let mut fig = SvgFigure::new(900, 600);
    let items = facet
        .plot(&mut fig, |fig, item| {
            let x: Vec<f32> = item.data[0].iter().filter_map(DataValue::as_f32).collect();
            let y: Vec<f32> = item.data[1].iter().filter_map(DataValue::as_f32).collect();
            fig.scatter(item.panel, &x, &y)
        })
        .expect("Failed to plot facets");
    for item in &items {
        println!("  ({}, {}) {} -> {} points", item.row, item.col, item.label, item.data[0].len());
    }

    // Step 4: Save
    println!("\nStep 4: Saving to SVG...");
    let output_path = "facet_scatter.svg";
    fig.write_to_file(output_path).expect("Failed to write SVG");
    println!("  Saved to: {}", output_path);
}

/// Hourly readings from five sites with different daily cycles.
fn sample_frame() -> DataFrame {
    let sites = ["alpine", "coastal", "desert", "forest", "urban"];
    let mut site = Vec::new();
    let mut hour = Vec::new();
    let mut temp = Vec::new();
    for (i, name) in sites.iter().enumerate() {
        let base = 5.0 + 6.0 * i as f32;
        let swing = 3.0 + i as f32;
        for h in 0..24 {
            let phase = (h as f32 - 14.0) / 24.0 * std::f32::consts::TAU;
            site.push(*name);
            hour.push(h as f32);
            temp.push(base + swing * phase.cos());
        }
    }
    DataFrame::new()
        .with_str("site", &site)
        .with_f32("hour", &hour)
        .with_f32("temp", &temp)
}
