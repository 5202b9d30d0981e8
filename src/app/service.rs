//! Control loop — the per-tick orchestrator.
//!
//! [`ControlLoop`] owns the duty-cycle scheduler and the command
//! transport. The driver calls [`ControlLoop::once`] once per drained
//! tick, then pushes the resulting actuator states out through an
//! [`ActuatorPort`].
//!
//! ```text
//!  TemperatureSource ──▶ ┌──────────────────────────┐ ──▶ ActuatorPort
//!                        │       ControlLoop        │
//!          Transport ◀──▶│  Scheduler · PID · RPC   │
//!                        └──────────────────────────┘
//! ```

use log::warn;

use crate::control::pid::Controller;
use crate::rpc::codec::FRAME_LEN;
use crate::rpc::engine;
use crate::rpc::transport::Transport;
use crate::scheduler::{DutyCycleScheduler, TickPhase};

use super::ports::{ActuatorPort, TemperatureSource};

pub struct ControlLoop<C, S, T> {
    scheduler: DutyCycleScheduler<C, S>,
    transport: T,
    frames_served: u32,
}

impl<C, S, T> ControlLoop<C, S, T>
where
    C: Controller,
    S: TemperatureSource,
    T: Transport,
{
    pub fn new(scheduler: DutyCycleScheduler<C, S>, transport: T) -> Self {
        Self {
            scheduler,
            transport,
            frames_served: 0,
        }
    }

    /// Advance the schedule, then answer at most one pending command.
    ///
    /// Commands are only serviced on ticks that actually advanced the
    /// schedule; a disabled or warming-up scheduler leaves the transport
    /// untouched.
    pub fn once(&mut self, now: u32) -> TickPhase {
        let phase = self.scheduler.tick(now);
        if phase == TickPhase::Advanced {
            self.service_command();
        }
        phase
    }

    /// Push the latest heater and pump states to the outputs.
    pub fn apply_outputs<A: ActuatorPort + ?Sized>(&self, outputs: &mut A) {
        outputs.set_heater(self.scheduler.heater_on());
        outputs.set_pump(self.scheduler.pump_on());
    }

    /// Returns `true` if a frame was consumed and answered.
    fn service_command(&mut self) -> bool {
        match self.transport.available() {
            Ok(n) if n >= FRAME_LEN => {}
            Ok(_) => return false,
            Err(e) => {
                warn!("rpc: transport poll failed: {:?}", e);
                return false;
            }
        }

        let mut request = [0u8; FRAME_LEN];
        if let Err(e) = self.transport.read_exact(&mut request) {
            warn!("rpc: read failed: {:?}", e);
            return false;
        }

        let response = engine::handle(&request, &mut self.scheduler);
        self.frames_served = self.frames_served.wrapping_add(1);

        if let Err(e) = self
            .transport
            .write(&response)
            .and_then(|()| self.transport.flush())
        {
            warn!("rpc: write failed: {:?}", e);
        }
        true
    }

    // ── Accessors ─────────────────────────────────────────────

    pub fn scheduler(&self) -> &DutyCycleScheduler<C, S> {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut DutyCycleScheduler<C, S> {
        &mut self.scheduler
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Requests answered since construction (wrapping).
    pub fn frames_served(&self) -> u32 {
        self.frames_served
    }
}
