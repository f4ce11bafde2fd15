use anyhow::Result;
use fastrand::Rng;
use ndarray::{arr2, s, Array2};
use test_log::test;
use vehtrack_core::{EnvModel, ModelError};
use vehtrack_env::{
    DynamicsModel, Veh2dofDynamics, Veh2dofInfo, Veh2dofModel, Veh2dofModelConfig,
    Veh3dofDynamics, VehAct, VehObs, VehicleParams,
};

fn model() -> Veh2dofModel {
    Veh2dofModel::build(&Veh2dofModelConfig::default()).unwrap()
}

fn random_obs(rng: &Rng, n: usize) -> VehObs {
    let scale = [0.5, 0.3, 2.0, 0.5];
    VehObs(Array2::from_shape_fn((n, 4), |(_, j)| {
        scale[j] * (2.0 * rng.f32() - 1.0)
    }))
}

fn random_act(rng: &Rng, n: usize) -> VehAct {
    VehAct(Array2::from_shape_fn((n, 1), |_| 2.0 * rng.f32() - 1.0))
}

#[test]
fn test_zero_state_stays_at_rest() -> Result<()> {
    let m = model();
    let obs = VehObs(Array2::zeros((1, 4)));
    let act = VehAct(Array2::zeros((1, 1)));
    let step = m.step(&obs, &act, &[0], Veh2dofInfo::default())?;
    assert_eq!(step.obs.0, Array2::<f32>::zeros((1, 4)));
    assert_eq!(step.reward, vec![0.0]);
    assert_eq!(step.is_terminated, vec![0]);
    Ok(())
}

#[test]
fn test_dims_and_bounds() {
    let m = model();
    assert_eq!(m.obs_dim(), 4);
    assert_eq!(m.act_dim(), 1);
    assert_eq!(m.action_bounds(), (vec![-1.0], vec![1.0]));
}

#[test]
fn test_step_scales_steer() -> Result<()> {
    let m = model();
    let obs = arr2(&[[0.1, -0.05, 0.5, 0.02]]);
    let act = arr2(&[[0.5]]);
    let info = Veh2dofInfo::default();
    let step = m.step(&VehObs(obs.clone()), &VehAct(act.clone()), &[0], info)?;

    let d = m.dynamics();
    let steer = act.mapv(|a| a * Veh2dofDynamics::STEER_SCALE);
    assert_eq!(step.obs.0, d.prediction(obs.view(), steer.view(), 10.0)?);
    assert_eq!(
        step.reward,
        d.compute_rewards(obs.view(), steer.view())?.to_vec()
    );
    assert_eq!(step.obs.0, d.simulation(obs.view(), act.view(), 10.0)?);
    Ok(())
}

#[test]
fn test_batch_independence() -> Result<()> {
    let m = model();
    let rng = Rng::with_seed(1);
    let n = 5;
    let obs = random_obs(&rng, n);
    let act = random_act(&rng, n);
    let step = m.step(&obs, &act, &vec![0i8; n], Veh2dofInfo::default())?;

    for i in 0..n {
        let obs_i = VehObs(obs.0.slice(s![i..i + 1, ..]).to_owned());
        let act_i = VehAct(act.0.slice(s![i..i + 1, ..]).to_owned());
        let step_i = m.step(&obs_i, &act_i, &[0], Veh2dofInfo::default())?;
        assert_eq!(step_i.obs.0.row(0), step.obs.0.row(i));
        assert_eq!(step_i.reward[0], step.reward[i]);
    }
    Ok(())
}

#[test]
fn test_reward_is_not_positive() -> Result<()> {
    let m = model();
    let rng = Rng::with_seed(2);
    for _ in 0..20 {
        let obs = random_obs(&rng, 8);
        let act = random_act(&rng, 8);
        let step = m.step(&obs, &act, &[0; 8], Veh2dofInfo::default())?;
        assert!(step.reward.iter().all(|&r| r <= 0.0));
        assert!(step
            .obs
            .0
            .column(3)
            .iter()
            .all(|&v| v > -std::f32::consts::PI && v <= std::f32::consts::PI));
    }
    Ok(())
}

#[test]
fn test_shape_mismatch() {
    let m = model();
    let obs = VehObs(Array2::zeros((2, 4)));
    let act = VehAct(Array2::zeros((2, 2)));
    let err = m
        .step(&obs, &act, &[0, 0], Veh2dofInfo::default())
        .unwrap_err();
    assert!(matches!(err, ModelError::ShapeMismatch { ref what, .. } if what == "act"));

    let obs = VehObs(Array2::zeros((2, 5)));
    let act = VehAct(Array2::zeros((2, 1)));
    let err = m
        .step(&obs, &act, &[0, 0], Veh2dofInfo::default())
        .unwrap_err();
    assert!(matches!(err, ModelError::ShapeMismatch { ref what, .. } if what == "obs"));
}

#[test]
fn test_rollout_accumulates_rewards() -> Result<()> {
    let m = model();
    let rng = Rng::with_seed(4);
    let obs = random_obs(&rng, 3);
    let policy = |o: &VehObs| VehAct(o.0.slice(s![.., 2..3]).mapv(|dy| -0.1 * dy));
    let rollout = m.rollout(&obs, policy, 4)?;

    let mut cur = obs;
    let mut total = vec![0.0f32; 3];
    for k in 0..4 {
        let act = policy(&m.scale_obs(&cur));
        let step = m.step(&cur, &act, &[0; 3], Veh2dofInfo::default())?;
        for (t, r) in total.iter_mut().zip(step.reward.iter()) {
            *t += r;
        }
        assert_eq!(step.obs, rollout.obs[k]);
        cur = step.obs;
    }
    assert_eq!(rollout.v_pi.to_vec(), total);
    Ok(())
}

#[test]
fn test_dynamics_dispatch() -> Result<()> {
    let params = VehicleParams::default();
    let d3: DynamicsModel = Veh3dofDynamics::new(params.clone(), 1.0).into();
    let d2: DynamicsModel = Veh2dofDynamics::new(params, Veh2dofDynamics::STEER_SCALE).into();

    assert_eq!((d3.state_dim(), d3.act_dim()), (6, 2));
    assert_eq!((d2.state_dim(), d2.act_dim()), (4, 1));
    assert!(d3.judges_termination());
    assert!(!d2.judges_termination());

    let s3 = arr2(&[[0.0, 0.0, 0.0, 10.0, 0.0, 0.0]]);
    let a3 = Array2::zeros((1, 2));
    let next = d3.prediction(s3.view(), a3.view(), 10.0)?;
    assert!((next[[0, 0]] - 1.0).abs() < 1e-6);
    assert_eq!(next[[0, 1]], 0.0);

    // a state of one model is rejected by the other
    assert!(d2.prediction(s3.view(), a3.view(), 10.0).is_err());
    Ok(())
}

#[test]
fn test_base_frequency_must_match_identification() -> Result<()> {
    let config = Veh2dofModelConfig {
        base_frequency: 50.0,
        ..Veh2dofModelConfig::default()
    };
    assert!(Veh2dofModel::build(&config).is_err());

    let dir = tempdir::TempDir::new("veh2dof_base_frequency")?;
    let path = dir.path().join("config.yaml");
    config.save(&path)?;
    assert!(Veh2dofModel::build(&Veh2dofModelConfig::load(&path)?).is_err());
    Ok(())
}
