//! Periodic tick timer using ESP-IDF's esp_timer API.
//!
//! One periodic timer counts a [`tick`](crate::tick) every
//! `tick_period_ms` and wakes the main task with a FreeRTOS task
//! notification. The callback runs in the esp_timer task context (not
//! an ISR). The main task blocks in [`wait_for_tick`] rather than
//! sleeping, since `vTaskDelay` cannot wait less than one FreeRTOS tick
//! (10 ms at the default `CONFIG_FREERTOS_HZ`).
//!
//! On host targets the timer is not started; tests call
//! [`tick::signal`](crate::tick::signal) or drive the loop directly.

use super::hw_init::HwInitError;

#[cfg(target_os = "espidf")]
use core::sync::atomic::{AtomicPtr, Ordering};

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

#[cfg(target_os = "espidf")]
use log::info;

#[cfg(target_os = "espidf")]
static mut TICK_TIMER: esp_timer_handle_t = core::ptr::null_mut();

/// Task woken on every tick; null until the timer is armed.
#[cfg(target_os = "espidf")]
static WAITER: AtomicPtr<tskTaskControlBlock> = AtomicPtr::new(core::ptr::null_mut());

#[cfg(target_os = "espidf")]
unsafe extern "C" fn tick_cb(_arg: *mut core::ffi::c_void) {
    crate::tick::signal();
    let task = WAITER.load(Ordering::Acquire);
    if !task.is_null() {
        // SAFETY: `task` is the main task, which never exits.
        unsafe {
            xTaskGenericNotify(task, 0, 0, eNotifyAction_eIncrement, core::ptr::null_mut());
        }
    }
}

/// Arm the periodic tick and register the calling task as the one to
/// wake. Call [`tick::reset`](crate::tick::reset) first.
#[cfg(target_os = "espidf")]
pub fn start_tick_timer(period_ms: u32) -> Result<(), HwInitError> {
    // SAFETY: TICK_TIMER is written here once at boot from the main task,
    // before the callback is armed.
    unsafe {
        WAITER.store(xTaskGetCurrentTaskHandle(), Ordering::Release);

        let args = esp_timer_create_args_t {
            callback: Some(tick_cb),
            arg: core::ptr::null_mut(),
            dispatch_method: esp_timer_dispatch_t_ESP_TIMER_TASK,
            name: c"tick".as_ptr(),
            skip_unhandled_events: true,
        };
        let ret = esp_timer_create(&args, &raw mut TICK_TIMER);
        if ret != ESP_OK {
            return Err(HwInitError::TimerFailed(ret));
        }
        let ret = esp_timer_start_periodic(TICK_TIMER, u64::from(period_ms) * 1_000);
        if ret != ESP_OK {
            return Err(HwInitError::TimerFailed(ret));
        }
    }
    info!("hw_timer: tick every {} ms", period_ms);
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn start_tick_timer(period_ms: u32) -> Result<(), HwInitError> {
    log::info!("hw_timer(sim): {} ms tick not started", period_ms);
    Ok(())
}

/// Block the calling task until the tick callback notifies it, or
/// `timeout_ms` passes. Ticks are still drained with
/// [`tick::take`](crate::tick::take); this only sleeps between them.
#[cfg(target_os = "espidf")]
pub fn wait_for_tick(timeout_ms: u32) {
    let ticks = (timeout_ms.saturating_mul(configTICK_RATE_HZ) / 1_000).max(1);
    // SAFETY: waits on the calling task's own notification slot 0.
    unsafe {
        ulTaskGenericNotifyTake(0, 1, ticks);
    }
}

#[cfg(not(target_os = "espidf"))]
pub fn wait_for_tick(_timeout_ms: u32) {}
