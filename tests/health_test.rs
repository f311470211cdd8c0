//! Distributed health checks across an in-process cluster.

mod common;

use std::sync::Arc;

use common::{ZeroOperator, air_state, base_config, gas, unit_mesh};
use dg_march::analysis::HealthIssue;
use dg_march::comm::{Communicator, LocalCluster};
use dg_march::io::{CheckpointManager, RecordingSink};
use dg_march::{Controller, Discretization, RhsComposer, StepContext};

#[test]
fn test_single_nan_on_one_rank_stops_every_rank() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = base_config(dir.path());
    let partitions = unit_mesh().split_contiguous(4);

    let outcomes = LocalCluster::run(4, |comm| {
        let rank = comm.rank();
        let gas = gas(&config);
        let disc = Arc::new(Discretization::new(
            partitions[rank.as_usize()].clone(),
            config.order,
        ));
        let mut state = air_state(gas.as_ref(), &disc, 0);
        if rank.as_usize() == 2 {
            state.cv.energy[1] = f64::NAN;
        }

        let rhs = RhsComposer::new(&config, gas, Arc::new(ZeroOperator), disc, &state.cv);
        let checkpoints = CheckpointManager::from_config(&config, rank);
        let mut controller =
            Controller::new(config.clone(), rhs, checkpoints, RecordingSink::new(), comm);
        let result = controller.run(&mut state, StepContext::new(0, 0.0));
        (result.map_err(|e| e.to_string()), controller.into_sink().steps())
    });

    for (rank, (result, viz_steps)) in outcomes.iter().enumerate() {
        let message = result.as_ref().expect_err("every rank fails");
        assert!(message.contains("step 0"), "rank {}: {}", rank, message);
        assert_eq!(viz_steps, &vec![0], "rank {} emergency snapshot", rank);
        let dump = dir.path().join(format!("test-000000-{:04}.rst", rank));
        assert!(dump.exists(), "rank {} emergency checkpoint", rank);
    }
    assert!(outcomes[2].0.as_ref().unwrap_err().contains("NaN/Inf in pressure"));
}

#[test]
fn test_issue_display() {
    let issue = HealthIssue::TemperatureNotConverged {
        residual: 2.0e-3,
        tolerance: 1.0e-4,
    };
    assert!(issue.to_string().starts_with("Temperature is not converged"));
}
