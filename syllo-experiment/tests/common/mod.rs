#![allow(dead_code)]

use std::fs;
use std::path::Path;

use syllo_core::PathLoader;
use syllo_experiment::{ExperimentConfig, RecordStore, TrialController};
use syllo_timing::ManualTimer;
use tempfile::TempDir;

pub const TEST_ITEMS: [&str; 8] = [
    "01_T_p1.png",
    "02_T_p2.png",
    "03_T_p3.png",
    "04_T_p4.png",
    "05_T_c1.png",
    "06_T_s1.png",
    "07_T_c2.png",
    "08_T_s2.png",
];

fn touch(dir: &Path, names: &[&str]) {
    fs::create_dir_all(dir).unwrap();
    for name in names {
        fs::write(dir.join(name), b"img").unwrap();
    }
}

/// Image tree with three conclusions in `Folder1` and two in `Folder2`.
pub fn image_tree() -> TempDir {
    let tmp = tempfile::tempdir().unwrap();
    let images = tmp.path().join("Images");
    touch(&images.join("Test"), &TEST_ITEMS);
    touch(
        &images.join("Folder1/Premises"),
        &["01_P_a.png", "02_P_b.png", "notes.txt"],
    );
    touch(
        &images.join("Folder1/Conclusions"),
        &["01_T_a.jpg", "02_F_a.jpg", "03_T_b.jpg", "bad.jpg"],
    );
    touch(&images.join("Folder2/Premises"), &["01_P_x.png"]);
    touch(&images.join("Folder2/Conclusions"), &["01_F_x.jpg", "02_T_x.jpg"]);
    fs::write(tmp.path().join("InstructionImage.png"), b"img").unwrap();
    tmp
}

pub fn config(root: &Path) -> ExperimentConfig {
    ExperimentConfig {
        images_root: root.join("Images"),
        instructions_image: root.join("InstructionImage.png"),
        records_path: root.join("records.csv"),
        ..ExperimentConfig::default()
    }
}

pub type Controller<S> = TrialController<ManualTimer, PathLoader, S>;

pub fn controller<S: RecordStore>(root: &Path, store: S) -> (Controller<S>, ManualTimer) {
    let timer = ManualTimer::new();
    let c = TrialController::new(config(root), timer.clone(), PathLoader, store).unwrap();
    (c, timer)
}
