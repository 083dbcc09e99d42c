//! Basic usage example of the Seurat shared memory layout compiler

use seurat::{CppHeaderGenerator, Result, SchemaDocument, SharedMemoryAllocator};

fn main() -> Result<()> {
    // Initialize logging
    env_logger::init();

    println!("Seurat Shared Memory Layout Example");
    println!("===================================");

    let doc = SchemaDocument::from_json(
        r#"{
            "segment_name": "seurat_demo",
            "variables": [{"name": "dt", "type": "float64"}],
            "arrays": [{"name": "c", "type": "float32", "shape": [4, 4]}]
        }"#,
    )?;

    // Creator side: compile the schema, create the segment, bind views
    let mut creator = SharedMemoryAllocator::create(&doc)?;
    println!("Created segment '{}'", creator.segment().name());
    for field in &creator.layout().fields {
        println!(
            "  {:<8} {:<8} offset={:<4} bytes={}",
            field.name,
            field.element_type.type_name(),
            field.offset,
            field.byte_size
        );
    }
    println!("  total: {} bytes", creator.layout().total_size);

    // Write through the typed views
    creator.fields_mut().view_mut("dt")?.set(0.1f64)?;
    creator.fields_mut().view_mut("c")?.fill(100.0f32)?;

    // Attacher side: same schema, existing segment, independent views
    let mut attacher = SharedMemoryAllocator::attach(&doc)?;
    let dt: f64 = attacher.fields().view("dt")?.get()?;
    let c0: f32 = attacher.fields().view("c")?.element(0)?;
    println!("Attacher sees dt = {}, c[0] = {}", dt, c0);

    // The static side gets the same layout as a generated header
    let header = CppHeaderGenerator::new().generate(creator.layout())?;
    println!("\nGenerated C++ header:\n{}", header);

    // Attachers never release the OS object; the creator does
    attacher.close(false)?;
    creator.close(true)?;
    println!("Done.");

    Ok(())
}
