mod common;

use common::*;
use serde_json::{Value, json};
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use tempfile::tempdir;
use tiff::encoder::{TiffEncoder, colortype};

use tidewater::config::Config;
use tidewater::estimator::EstimatorSet;
use tidewater::readers::{DataReader, GeoTiffReader};
use tidewater::retrieval::WaterProcessor;
use tidewater::sat_bands::{AUX_BAND_NAMES, NOMINAL_WAVELENGTHS, SatBands};
use tidewater::scene::Scene;
use tidewater::writers::{PRODUCT_DESCRIPTION_FILE, write_product};

const WIDTH: u32 = 4;
const HEIGHT: u32 = 3;

fn network_json(output_ranges: Vec<(f32, f32)>) -> Value {
    let hidden: Vec<Vec<f32>> = (0..HIDDEN_NODES)
        .map(|j| (0..18).map(|i| ((i + j) % 5) as f32 * 0.1 - 0.2).collect())
        .collect();
    let last: Vec<Vec<f32>> = (0..output_ranges.len())
        .map(|k| {
            (0..HIDDEN_NODES)
                .map(|j| if j == k % HIDDEN_NODES { 0.5 } else { 0.0 })
                .collect()
        })
        .collect();
    let inputs: Vec<[f32; 2]> = input_ranges().iter().map(|r| [r.min(), r.max()]).collect();
    let outputs: Vec<[f32; 2]> = output_ranges.iter().map(|&(lo, hi)| [lo, hi]).collect();
    json!({
        "input_ranges": inputs,
        "output_ranges": outputs,
        "layers": [
            { "weights": hidden, "biases": vec![0.1; HIDDEN_NODES] },
            { "weights": last, "biases": vec![0.2; output_ranges.len()] }
        ]
    })
}

fn write_band(path: &Path, data: &[f32]) {
    let out = BufWriter::new(File::create(path).unwrap());
    let mut encoder = TiffEncoder::new(out).unwrap();
    encoder
        .write_image::<colortype::Gray32Float>(WIDTH, HEIGHT, data)
        .unwrap();
}

/// Scenario geometry everywhere; the first row is INVALID and the last pixel is BRIGHT.
fn write_scene(directory: &Path) {
    let pixels = (WIDTH * HEIGHT) as usize;
    let bands = SatBands::default();
    let tiffs = directory.join("measurement");
    fs::create_dir_all(&tiffs).unwrap();

    let mut band_info = serde_json::Map::new();
    for (i, name) in bands.radiance_names().iter().enumerate() {
        write_band(
            &tiffs.join(format!("{name}.tif")),
            &vec![MID_SCENE_RADIANCES[i]; pixels],
        );
        band_info.insert(name.clone(), json!({ "wavelength": NOMINAL_WAVELENGTHS[i] }));
    }

    let mut flags = vec![0.0; pixels];
    flags[..WIDTH as usize].fill(128.0);
    flags[pixels - 1] = 32.0;
    write_band(&tiffs.join("l1_flags.tif"), &flags);

    let aux = [30.0, 30.0, 30.0, 30.0, 2.0, 2.0, 1013.0, 300.0];
    for (name, value) in AUX_BAND_NAMES.iter().zip(aux) {
        write_band(&tiffs.join(format!("{name}.tif")), &vec![value; pixels]);
    }

    let metadata = json!({
        "product_type": "MER_RR__1P",
        "width": WIDTH,
        "height": HEIGHT,
        "sensing_start": "2008-06-19T09:41:22Z",
        "bands": band_info
    });
    fs::write(directory.join("scene.json"), metadata.to_string()).unwrap();
}

#[test]
fn test_config_to_product() {
    let dir = tempdir().unwrap();
    let scene_dir = dir.path().join("scene");
    let output_dir = dir.path().join("out");
    write_scene(&scene_dir);

    let networks = json!({
        "chlorophyll": network_json(vec![CHL_RANGE]),
        "yellow_substance": network_json(vec![YS_RANGE]),
        "suspended_matter": network_json(vec![TSM_RANGE]),
        "atmospheric_correction": network_json(atm_corr_ranges())
    });
    let networks_path = dir.path().join("networks.json");
    fs::write(&networks_path, networks.to_string()).unwrap();

    let config_path = dir.path().join("config.json");
    let config = json!({
        "scene_directory": scene_dir,
        "output_directory": output_dir,
        "estimators": networks_path,
        "processing": { "computeTSM": false }
    });
    fs::write(&config_path, config.to_string()).unwrap();

    let config = Config::from_file(&config_path).unwrap();
    let estimators = EstimatorSet::from_file(config.estimators()).unwrap();
    let processor = WaterProcessor::new(config.processing().clone(), estimators);
    let scene = Scene::load(config.scene_directory(), processor.bands()).unwrap();

    let processed = processor.process(&scene, &AtomicBool::new(false)).unwrap();
    assert_eq!(processed.product_type, "MER_RR__1P_WATER");
    assert_eq!(processed.result.slot_count(), 14);

    let flags = processed.result.flags();
    assert!(flags[..WIDTH as usize].iter().all(|&f| f == 0x0001));
    assert!(flags[WIDTH as usize..flags.len() - 1].iter().all(|&f| f == 0));
    assert_eq!(flags[flags.len() - 1], 0x0001);

    let written = write_product(&processed, &scene, config.output_directory()).unwrap();
    // 14 bands, result_flags, l1_flags and product.json
    assert_eq!(written.len(), 17);

    let chl = GeoTiffReader::new(output_dir.join("algal_2.tif"))
        .read_data()
        .unwrap();
    assert_eq!((chl.width, chl.height), (WIDTH, HEIGHT));
    assert!(chl.buffer[..WIDTH as usize].iter().all(|&v| v == 5.0));
    assert!(within_range(CHL_RANGE, chl.buffer[WIDTH as usize]));

    let result_flags = GeoTiffReader::new(output_dir.join("result_flags.tif"))
        .read_data()
        .unwrap();
    assert_eq!(result_flags.buffer[0], 1.0);

    let l1_flags = GeoTiffReader::new(output_dir.join("l1_flags.tif"))
        .read_data()
        .unwrap();
    assert_eq!((l1_flags.width, l1_flags.height), (WIDTH, HEIGHT));
    assert!(l1_flags.buffer[..WIDTH as usize].iter().all(|&f| f == 128.0));
    assert_eq!(l1_flags.buffer[WIDTH as usize], 0.0);
    assert_eq!(l1_flags.buffer[l1_flags.buffer.len() - 1], 32.0);

    let description: Value =
        serde_json::from_str(&fs::read_to_string(output_dir.join(PRODUCT_DESCRIPTION_FILE)).unwrap())
            .unwrap();
    assert_eq!(description["product_type"], "MER_RR__1P_WATER");
    assert_eq!(description["flag_band"], "result_flags");
    assert_eq!(description["bands"].as_array().unwrap().len(), 14);
    assert_eq!(description["flag_coding"]["flags"][8]["name"], "ATM_OUT");
    assert_eq!(description["flag_coding"]["flags"][8]["value"], 256);
    assert_eq!(description["source_flag_band"], "l1_flags");
    assert_eq!(description["source_flag_coding"]["flags"][7]["name"], "INVALID");
    assert_eq!(description["source_flag_coding"]["flags"][7]["value"], 128);
}

#[test]
fn test_missing_estimator_fails_before_processing() {
    let dir = tempdir().unwrap();
    let scene_dir = dir.path().join("scene");
    write_scene(&scene_dir);

    let processor = WaterProcessor::new(Default::default(), EstimatorSet::new());
    let scene = Scene::load(&scene_dir, processor.bands()).unwrap();
    let err = processor.process(&scene, &AtomicBool::new(false)).unwrap_err();
    assert!(err.to_string().contains("chlorophyll"), "{err}");
}

#[test]
fn test_incompatible_expression_fails_before_processing() {
    let dir = tempdir().unwrap();
    let scene_dir = dir.path().join("scene");
    write_scene(&scene_dir);

    let options = tidewater::config::ProcessingOptions {
        valid_pixel_expression: "not l1_flags.CLOUDY".to_string(),
        ..Default::default()
    };
    let processor = WaterProcessor::new(options, estimator_set());
    let scene = Scene::load(&scene_dir, processor.bands()).unwrap();
    let err = processor.process(&scene, &AtomicBool::new(false)).unwrap_err();
    assert!(err.to_string().contains("CLOUDY"), "{err}");
}

fn within_range((lo, hi): (f32, f32), value: f32) -> bool {
    value.is_finite() && value >= lo && value <= hi
}
