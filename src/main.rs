use clap::Parser;
use env_logger::Env;
use lumos::{
    console::{show_intro, Args},
    error::{LumosError, LumosResult},
    Scene, SceneDocument,
};
use std::fs;
use std::io::{self, Write};
use std::path::Path;

fn read_and_parse_scene(path: &Path) -> LumosResult<Scene> {
    print!("\nReading scene...");
    let _ = io::stdout().flush();
    let document = SceneDocument::from_file(path)?;
    let scene = Scene::from_document(&document)?;
    println!("Success");
    Ok(scene)
}

fn write_readouts(path: &Path, scene: &Scene) -> LumosResult<()> {
    print!("Write detector readouts to {}...", path.display());
    let _ = io::stdout().flush();
    let serialized = serde_yaml::to_string(&scene.readouts())
        .map_err(|e| LumosError::Other(format!("serialization of readouts failed: {e}")))?;
    fs::write(path, serialized)
        .map_err(|e| LumosError::Other(format!("writing readout file failed: {e}")))?;
    println!("Success");
    Ok(())
}

fn main() -> LumosResult<()> {
    env_logger::init_from_env(Env::default().default_filter_or("info"));
    let args = Args::parse();
    show_intro();

    let mut scene = read_and_parse_scene(&args.file_path)?;
    args.apply_to(scene.config_mut())?;

    let result = scene.trace_all();
    println!("{}", result.statistics);
    for report in scene.readouts() {
        println!("{} ({}): {:?}", report.name, report.kind, report.readout);
    }
    if let Some(output) = &args.output {
        write_readouts(output, &scene)?;
    }
    Ok(())
}
