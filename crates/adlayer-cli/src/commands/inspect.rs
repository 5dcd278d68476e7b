//! The `inspect` command: print a human-readable summary of a saved session.

use crate::cli::InspectArgs;
use crate::error::Result;
use adlayer::core::models::catalog::Catalog;
use adlayer::workflows::session_io;

pub fn run(args: InspectArgs) -> Result<()> {
    let catalog = Catalog::load(&args.catalog)?;
    let session = session_io::load(&args.session, &catalog)?;

    let bounds = session.current_layer().bounds();
    println!("layers:        {}", session.layer_count());
    println!("current layer: {}", session.current_index());
    println!(
        "bounds:        origin ({}, {}), {} x {} cells",
        bounds.left(),
        bounds.top(),
        bounds.width(),
        bounds.height()
    );

    for index in 0..session.layer_count() {
        let Some(layer) = session.layer(index) else {
            continue;
        };
        println!(
            "layer {index}: {} occupied positions, {} blocks, {} molecules",
            layer.occupied_position_count(),
            layer.block_count(),
            layer.molecule_count()
        );
        for (_, molecule) in layer.molecules_in_order() {
            println!(
                "  {} at ({}, {}), rotated {}°",
                molecule.spec.name,
                molecule.position.col,
                molecule.position.row,
                molecule.rotation.degrees()
            );
        }
    }
    Ok(())
}
