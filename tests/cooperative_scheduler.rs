//! Cooperative scheduler tests.
//!
//! The runner and a test script share one `block_on` executor. Each poll round
//! the runner applies at most one step and the simulated clock advances by one
//! PWM period.

mod common;

use core::future::Future;
use std::sync::atomic::{AtomicU32, Ordering};

use common::{settle, RecordingOutput, SimDelay};
use embassy_futures::block_on;
use embassy_futures::select::{select, Either};
use servo_pdm::error::CallbackError;
use servo_pdm::{Curve, MotionChannel, MotionState, ServoConfig, ServoPdm};

fn sg90() -> (ServoPdm<RecordingOutput>, RecordingOutput) {
    let output = RecordingOutput::new();
    let servo = ServoPdm::new(output.clone(), ServoConfig::sg90()).expect("valid servo");
    (servo, output)
}

/// Run `script` against a live runner and return its result.
fn drive<T>(
    channel: &MotionChannel,
    servo: &mut ServoPdm<RecordingOutput>,
    delay: SimDelay,
    script: impl Future<Output = T>,
) -> T {
    match block_on(select(channel.run(servo, delay), script)) {
        Either::First(result) => panic!("runner stopped early: {:?}", result),
        Either::Second(value) => value,
    }
}

static FIRST_DONE: AtomicU32 = AtomicU32::new(0);
static SECOND_DONE: AtomicU32 = AtomicU32::new(0);

fn first_done() -> Result<(), CallbackError> {
    FIRST_DONE.fetch_add(1, Ordering::SeqCst);
    Ok(())
}

fn second_done() -> Result<(), CallbackError> {
    SECOND_DONE.fetch_add(1, Ordering::SeqCst);
    Ok(())
}

#[test]
fn superseded_move_never_calls_back() {
    let channel = MotionChannel::new();
    let handle = channel.handle();
    let (mut servo, output) = sg90();

    let (writes_before, pulse_before) = drive(&channel, &mut servo, SimDelay::default(), async {
        handle.move_to_angle(90, 2000, Curve::Linear, Some(first_done));
        settle(40).await;
        let seen = (output.write_count(), output.last().expect("motion started"));

        handle.move_to_angle(20, 500, Curve::Linear, Some(second_done));
        settle(60).await;
        seen
    });

    assert_eq!(FIRST_DONE.load(Ordering::SeqCst), 0);
    assert_eq!(SECOND_DONE.load(Ordering::SeqCst), 1);
    assert_eq!(channel.state(), MotionState::Idle);

    let writes = output.writes();
    // First motion only ever climbed from the released start pulse.
    assert!(writes[..writes_before].windows(2).all(|w| w[0] <= w[1]));
    assert!(pulse_before > 722 && pulse_before < 1500);

    // The replacement starts from what was last applied, not from 1500.
    let first_of_second =
        (pulse_before as f32 - Curve::Linear.ease(20.0 / 500.0) * (pulse_before - 722) as f32) as u32;
    assert_eq!(writes[writes_before], first_of_second);
    assert_eq!(writes.len() - writes_before, 25);
    assert_eq!(output.last(), Some(722));
    assert_eq!(servo.angle().value(), 20.0);
}

static FAILING_CALLS: AtomicU32 = AtomicU32::new(0);

fn failing_callback() -> Result<(), CallbackError> {
    FAILING_CALLS.fetch_add(1, Ordering::SeqCst);
    Err(CallbackError::new("out of paper"))
}

#[test]
fn callback_failure_is_contained() {
    let channel = MotionChannel::new();
    let handle = channel.handle();
    let (mut servo, output) = sg90();

    drive(&channel, &mut servo, SimDelay::default(), async {
        handle.move_to_angle(180, 100, Curve::EaseOutQuad, Some(failing_callback));
        settle(20).await;
        assert!(!handle.is_moving());

        // The runner is still alive and accepts the next command.
        handle.move_to_angle(90, 60, Curve::Linear, None);
        settle(20).await;
    });

    assert_eq!(FAILING_CALLS.load(Ordering::SeqCst), 1);
    // The servo holds its last position.
    assert!(!servo.is_released());
    assert_eq!(output.last(), Some(1500));
}

static RELEASED_DONE: AtomicU32 = AtomicU32::new(0);

fn released_done() -> Result<(), CallbackError> {
    RELEASED_DONE.fetch_add(1, Ordering::SeqCst);
    Ok(())
}

#[test]
fn release_cancels_motion_and_is_idempotent() {
    let channel = MotionChannel::new();
    let handle = channel.handle();
    let (mut servo, output) = sg90();

    drive(&channel, &mut servo, SimDelay::default(), async {
        handle.move_to_angle(180, 1000, Curve::Linear, Some(released_done));
        settle(5).await;
        handle.release();
        settle(5).await;
        let after_first = output.write_count();

        handle.release();
        settle(5).await;
        assert_eq!(output.write_count(), after_first + 1);
        settle(80).await;
    });

    assert_eq!(RELEASED_DONE.load(Ordering::SeqCst), 0);
    assert_eq!(channel.state(), MotionState::Idle);
    assert!(servo.is_released());
    let writes = output.writes();
    assert_eq!(&writes[writes.len() - 2..], [0, 0]);
}

static JUMP_DONE: AtomicU32 = AtomicU32::new(0);

fn jump_done() -> Result<(), CallbackError> {
    JUMP_DONE.fetch_add(1, Ordering::SeqCst);
    Ok(())
}

#[test]
fn zero_duration_jumps_then_calls_back() {
    let channel = MotionChannel::new();
    let handle = channel.handle();
    let (mut servo, output) = sg90();
    let delay = SimDelay::default();

    drive(&channel, &mut servo, delay.clone(), async {
        handle.move_to_angle(180, 0, Curve::EaseInBack, Some(jump_done));
        settle(5).await;
    });

    assert_eq!(output.writes(), [2500]);
    assert_eq!(JUMP_DONE.load(Ordering::SeqCst), 1);
    // The single step still holds for one period before completing.
    assert_eq!(delay.now_ms(), 20);
}

#[test]
fn set_angle_cancels_motion() {
    let channel = MotionChannel::new();
    let handle = channel.handle();
    let (mut servo, output) = sg90();

    drive(&channel, &mut servo, SimDelay::default(), async {
        handle.move_to_angle(180, 1000, Curve::Linear, None);
        settle(3).await;
        handle.set_angle(45);
        assert!(!handle.is_moving());
        settle(60).await;
    });

    assert_eq!(output.last(), Some(1000));
    assert_eq!(servo.angle().value(), 45.0);
}

static CHAIN: MotionChannel = MotionChannel::new();
static CHAIN_DONE: AtomicU32 = AtomicU32::new(0);

fn chain_back() -> Result<(), CallbackError> {
    CHAIN.handle().move_to_angle(0, 100, Curve::Linear, Some(chain_done));
    Ok(())
}

fn chain_done() -> Result<(), CallbackError> {
    CHAIN_DONE.fetch_add(1, Ordering::SeqCst);
    Ok(())
}

#[test]
fn callback_can_start_next_motion() {
    let handle = CHAIN.handle();
    let (mut servo, output) = sg90();

    drive(&CHAIN, &mut servo, SimDelay::default(), async {
        handle.move_to_angle(180, 100, Curve::Linear, Some(chain_back));
        settle(30).await;
    });

    assert_eq!(CHAIN_DONE.load(Ordering::SeqCst), 1);
    assert_eq!(CHAIN.state(), MotionState::Idle);
    assert_eq!(
        output.writes(),
        [900, 1300, 1700, 2100, 2500, 2100, 1700, 1300, 900, 500]
    );
}

static BROKEN_DONE: AtomicU32 = AtomicU32::new(0);

fn broken_done() -> Result<(), CallbackError> {
    BROKEN_DONE.fetch_add(1, Ordering::SeqCst);
    Ok(())
}

#[test]
fn write_failure_stops_motion() {
    let channel = MotionChannel::new();
    let handle = channel.handle();
    let (mut servo, output) = sg90();

    drive(&channel, &mut servo, SimDelay::default(), async {
        handle.move_to_angle(180, 1000, Curve::Linear, Some(broken_done));
        settle(4).await;
        output.fail_writes(true);
        settle(4).await;
        assert!(!handle.is_moving());

        output.fail_writes(false);
        handle.set_angle(90);
        settle(4).await;
    });

    assert_eq!(BROKEN_DONE.load(Ordering::SeqCst), 0);
    assert_eq!(output.last(), Some(1500));
}

#[test]
fn deinit_ends_runner() {
    let channel = MotionChannel::new();
    let handle = channel.handle();
    let (mut servo, output) = sg90();

    let result = block_on(async {
        let script = async {
            handle.move_to_angle(90, 1000, Curve::Linear, None);
            settle(3).await;
            handle.deinit();
            core::future::pending::<()>().await
        };
        match select(channel.run(&mut servo, SimDelay::default()), script).await {
            Either::First(result) => result,
            Either::Second(()) => unreachable!(),
        }
    });

    assert!(result.is_ok());
    assert!(output.is_deinit());
    assert!(!handle.is_moving());
}
