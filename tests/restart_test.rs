//! Checkpoint/restart behaviour.

mod common;

use std::sync::Arc;

use common::{ZeroOperator, air_state, base_config, gas, setup, unit_mesh};
use dg_march::comm::SerialCommunicator;
use dg_march::config::OutputIntervals;
use dg_march::io::{CheckpointError, CheckpointManager, NullSink, RestartExpectation, RestartRecord};
use dg_march::{Controller, Discretization, MeshPartition, RankIndex, SimulationState, StepContext};

fn record(mesh: MeshPartition, order: usize, state: SimulationState, step: u64) -> RestartRecord {
    RestartRecord {
        global_n_elements: mesh.global_n_elements,
        mesh,
        state,
        time: step as f64 * 1.0e-8,
        step,
        order,
        num_parts: 1,
        nspecies: 0,
    }
}

fn expectation(order: usize) -> RestartExpectation {
    RestartExpectation {
        num_parts: 1,
        nspecies: 0,
        dim: 2,
        order,
    }
}

#[test]
fn test_round_trip_same_order() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = base_config(dir.path());
    let gas = gas(&config);
    let disc = Discretization::new(unit_mesh(), 2);
    let state = air_state(gas.as_ref(), &disc, 0);

    let manager = CheckpointManager::from_config(&config, RankIndex::new(0));
    let written = record(unit_mesh(), 2, state.clone(), 7);
    let path = manager
        .write(&written)
        .expect("write")
        .expect("not the restart source");
    assert_eq!(path, dir.path().join("test-000007-0000.rst"));

    let loaded = CheckpointManager::load(&path, &expectation(2)).expect("load");
    assert_eq!(loaded.step, 7);
    assert_eq!(loaded.time, 7.0e-8);
    assert_eq!(loaded.state, state);
    assert_eq!(loaded, written);
}

#[test]
fn test_order_change_preserves_total_mass() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = base_config(dir.path());
    let gas = gas(&config);
    let stored = Discretization::new(unit_mesh(), 3);
    let state = air_state(gas.as_ref(), &stored, 0);
    let mass_before = stored.integrate(&state.cv.mass);

    let manager = CheckpointManager::from_config(&config, RankIndex::new(0));
    let path = manager
        .write(&record(unit_mesh(), 3, state, 3))
        .expect("write")
        .expect("written");

    for target in [1, 2, 4] {
        let loaded = CheckpointManager::load(&path, &expectation(target)).expect("load");
        assert_eq!(loaded.order, target);

        let disc = Discretization::new(unit_mesh(), target);
        assert_eq!(loaded.state.cv.n_nodes(), disc.n_dofs());
        assert_eq!(loaded.state.temperature_seed.len(), disc.n_dofs());
        let mass_after = disc.integrate(&loaded.state.cv.mass);
        assert!(
            ((mass_after - mass_before) / mass_before).abs() < 1.0e-12,
            "order {}: {} vs {}",
            target,
            mass_after,
            mass_before
        );
    }
}

#[test]
fn test_partition_and_species_mismatch_rejected() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = base_config(dir.path());
    let gas = gas(&config);
    let disc = Discretization::new(unit_mesh(), 1);
    let state = air_state(gas.as_ref(), &disc, 0);

    let manager = CheckpointManager::from_config(&config, RankIndex::new(0));
    let path = manager
        .write(&record(unit_mesh(), 1, state, 0))
        .expect("write")
        .expect("written");

    let mut wrong_parts = expectation(1);
    wrong_parts.num_parts = 4;
    assert!(matches!(
        CheckpointManager::load(&path, &wrong_parts),
        Err(CheckpointError::PartitionMismatch {
            expected: 4,
            found: 1
        })
    ));

    let mut wrong_species = expectation(1);
    wrong_species.nspecies = 2;
    assert!(matches!(
        CheckpointManager::load(&path, &wrong_species),
        Err(CheckpointError::SpeciesMismatch { .. })
    ));
}

#[test]
fn test_restart_source_is_never_overwritten() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = base_config(dir.path());
    let gas = gas(&config);
    let disc = Discretization::new(unit_mesh(), 1);
    let state = air_state(gas.as_ref(), &disc, 0);

    let manager = CheckpointManager::from_config(&config, RankIndex::new(0));
    let source = manager
        .write(&record(unit_mesh(), 1, state.clone(), 5))
        .expect("write")
        .expect("written");
    let original_bytes = std::fs::read(&source).expect("read");

    let resumed = manager.clone().with_source(&source);
    let mut changed = state;
    changed.cv.mass[0] *= 2.0;
    let outcome = resumed
        .write(&record(unit_mesh(), 1, changed, 5))
        .expect("write");
    assert_eq!(outcome, None);
    assert_eq!(std::fs::read(&source).expect("read"), original_bytes);
}

#[test]
fn test_restart_source_matched_by_any_spelling() {
    let dir = tempfile::tempdir().expect("tempdir");
    let restart_dir = dir.path().join("rd");
    let config = base_config(&restart_dir);
    let gas = gas(&config);
    let disc = Discretization::new(unit_mesh(), 1);
    let state = air_state(gas.as_ref(), &disc, 0);

    let manager = CheckpointManager::from_config(&config, RankIndex::new(0));
    let written = manager
        .write(&record(unit_mesh(), 1, state.clone(), 5))
        .expect("write")
        .expect("written");
    let original_bytes = std::fs::read(&written).expect("read");

    let mut spellings = vec![restart_dir.join("..").join("rd").join("test-000005-0000.rst")];
    #[cfg(unix)]
    {
        let link = dir.path().join("rd-link");
        std::os::unix::fs::symlink(&restart_dir, &link).expect("symlink");
        spellings.push(link.join("test-000005-0000.rst"));
    }

    let mut changed = state;
    changed.cv.mass[0] *= 2.0;
    for spelling in spellings {
        assert_ne!(spelling, written);
        let resumed = manager.clone().with_source(&spelling);
        let outcome = resumed
            .write(&record(unit_mesh(), 1, changed.clone(), 5))
            .expect("write");
        assert_eq!(outcome, None, "{} was overwritten", spelling.display());
        assert_eq!(std::fs::read(&written).expect("read"), original_bytes);
    }

    // A different step is still written
    let resumed = manager.with_source(&written);
    assert!(resumed
        .write(&record(unit_mesh(), 1, changed, 6))
        .expect("write")
        .is_some());
}

#[test]
fn test_resumed_run_continues_from_checkpoint() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = base_config(dir.path()).with_intervals(OutputIntervals {
        nviz: 0,
        nrestart: 5,
        nhealth: 1,
        nstatus: 0,
        nlimit: 0,
    });

    // First leg: 0 -> 1e-7 writes steps 0, 5 and the final 10
    let (rhs, mut state) = setup(&config, Arc::new(ZeroOperator));
    let checkpoints = CheckpointManager::from_config(&config, RankIndex::new(0));
    let mut controller = Controller::new(config.clone(), rhs, checkpoints, NullSink, SerialCommunicator);
    controller
        .run(&mut state, StepContext::new(0, 0.0))
        .expect("first leg");
    let source = dir.path().join("test-000005-0000.rst");
    assert!(source.exists());
    let source_bytes = std::fs::read(&source).expect("read");

    // Second leg restarts from step 5
    let prefix = dir.path().join("test-000005");
    let path = CheckpointManager::rank_file(&prefix, RankIndex::new(0));
    assert_eq!(path, source);
    let restart = CheckpointManager::load(&path, &RestartExpectation::from_config(&config, 1))
        .expect("load");

    let (rhs, _) = setup(&config, Arc::new(ZeroOperator));
    let checkpoints = CheckpointManager::from_config(&config, RankIndex::new(0)).with_source(&path);
    let mut controller = Controller::new(config, rhs, checkpoints, NullSink, SerialCommunicator);
    let mut resumed = restart.state;
    let summary = controller
        .run(&mut resumed, StepContext::new(restart.step, restart.time))
        .expect("second leg");

    assert_eq!(summary.steps, 5);
    assert_eq!(summary.final_step, 10);
    assert!((summary.final_time - 1.0e-7).abs() < 1.0e-16);
    assert_eq!(std::fs::read(&source).expect("read"), source_bytes);
}
