//! Closed-loop runs of the axis drivers against the reference integrator

use glam::Vec3;
use glide_core::{AxisDriver, AxisDriverParams, AxisSource, DrivePolicy, Phase, RigidBody, SimBody};

const DT: f32 = 0.02;

fn driver(policy: DrivePolicy) -> AxisDriver {
    AxisDriver::new(AxisDriverParams {
        policy,
        axis: AxisSource::World(Vec3::Y),
        ..AxisDriverParams::default()
    })
}

fn run(driver: &mut AxisDriver, body: &mut SimBody, input: f32, ticks: usize) {
    for _ in 0..ticks {
        driver.drive(body, input, DT);
        body.step(DT);
    }
}

#[test]
fn absolute_policy_tracks_the_ramp_exactly() {
    let mut driver = driver(DrivePolicy::Absolute);
    let mut body = SimBody::default();

    for _ in 0..30 {
        driver.drive(&mut body, 1.0, DT);
        body.step(DT);
        let expected = driver.acceleration().value();
        assert!((body.angular_velocity().y - expected).abs() < 1e-5);
    }
}

#[test]
fn by_force_policy_reaches_and_holds_full_speed() {
    let mut driver = driver(DrivePolicy::ByForce);
    let mut body = SimBody::default();

    run(&mut driver, &mut body, 1.0, 200);
    assert_eq!(driver.acceleration().clear_value(), 1.0);

    let speed = body.angular_velocity().y;
    // at most one tick of force past the target speed
    assert!(speed >= 1.0 && speed <= 1.0 + 3.0 * DT + 1e-5, "{speed}");

    // coasting: no further torque once above the target
    run(&mut driver, &mut body, 1.0, 10);
    assert_eq!(body.angular_velocity().y, speed);
}

#[test]
fn reversing_input_brakes_then_spins_the_other_way() {
    let mut driver = driver(DrivePolicy::ByForce);
    let mut body = SimBody::default();
    run(&mut driver, &mut body, 1.0, 100);
    assert!(body.angular_velocity().y > 0.5);

    driver.drive(&mut body, -1.0, DT);
    // the ramp restarted from rest before taking the new input
    assert_eq!(driver.acceleration().phase(), Phase::Acceleration);
    assert!((driver.acceleration().clear_value() - DT).abs() < 1e-5);
    body.step(DT);

    run(&mut driver, &mut body, -1.0, 300);
    assert!(body.angular_velocity().y < -0.5, "{}", body.angular_velocity());
}

#[test]
fn partial_input_settles_on_partial_speed() {
    let mut driver = driver(DrivePolicy::Absolute);
    let mut body = SimBody::default();
    run(&mut driver, &mut body, 0.5, 100);

    let acceleration = driver.acceleration();
    assert!((acceleration.clear_value() - 0.5).abs() <= acceleration.accuracy() + 1e-6);
    assert!((body.angular_velocity().y - acceleration.value()).abs() < 1e-5);
}
