//! Bridge between the egui shell and the wallet controller.
//! Button clicks become `ControllerCommand`s here and run off the UI thread.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use fund_me_adapters::{Eip1193Host, FundMeConfig};
use fund_me_core::{
    AffordancePort, CommandOutcome, ControllerCommand, ControllerError,
    WalletController, CONNECT_LABEL,
};

type FundMeController = WalletController<Eip1193Host, SharedLabel>;

/// Connect button caption, written by the controller and read every frame.
#[derive(Debug, Clone)]
pub struct SharedLabel(Arc<Mutex<String>>);

impl Default for SharedLabel {
    fn default() -> Self {
        Self(Arc::new(Mutex::new(CONNECT_LABEL.to_owned())))
    }
}

impl SharedLabel {
    pub fn get(&self) -> String {
        self.0
            .lock()
            .map(|g| g.clone())
            .unwrap_or_else(|_| CONNECT_LABEL.to_owned())
    }
}

impl AffordancePort for SharedLabel {
    fn set_connect_label(&self, text: &str) {
        if let Ok(mut g) = self.0.lock() {
            *g = text.to_owned();
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogLine {
    pub level: LogLevel,
    pub text: String,
}

#[derive(Clone)]
pub struct ControllerBridge {
    controller: Arc<FundMeController>,
    label: SharedLabel,
    log: Arc<Mutex<Vec<LogLine>>>,
    in_flight: Arc<AtomicUsize>,
}

impl ControllerBridge {
    pub fn new(config: FundMeConfig) -> Self {
        let label = SharedLabel::default();
        let controller_config = config.controller_config();
        Self {
            controller: Arc::new(WalletController::new(
                Eip1193Host::new(config),
                label.clone(),
                controller_config,
            )),
            label,
            log: Arc::new(Mutex::new(Vec::new())),
            in_flight: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn connect_label(&self) -> String {
        self.label.get()
    }

    pub fn log_lines(&self) -> Vec<LogLine> {
        self.log.lock().map(|g| g.clone()).unwrap_or_default()
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Runs `command` in the background and repaints when it settles.
    /// Clicks are not debounced; overlapping commands each get their own session.
    pub fn dispatch(&self, command: ControllerCommand, ctx: &egui::Context) {
        self.in_flight.fetch_add(1, Ordering::SeqCst);
        let bridge = self.clone();
        let ctx = ctx.clone();
        let kind = command.kind();

        #[cfg(target_arch = "wasm32")]
        {
            wasm_bindgen_futures::spawn_local(async move {
                let result = bridge.controller.handle(command).await;
                bridge.finish(kind, result);
                ctx.request_repaint();
            });
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            std::thread::spawn(move || {
                match tokio::runtime::Runtime::new() {
                    Ok(rt) => {
                        let result = rt.block_on(bridge.controller.handle(command));
                        bridge.finish(kind, result);
                    }
                    Err(e) => {
                        bridge.push(LogLevel::Error, format!("{kind}: failed to start runtime: {e}"));
                        bridge.in_flight.fetch_sub(1, Ordering::SeqCst);
                    }
                }
                ctx.request_repaint();
            });
        }
    }

    fn finish(&self, kind: &str, result: Result<CommandOutcome, ControllerError>) {
        match result {
            Ok(outcome) => {
                if let Some(text) = describe_outcome(&outcome) {
                    self.push(LogLevel::Info, text);
                }
            }
            Err(e) => self.push(LogLevel::Error, format!("{kind} failed: {e}")),
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
    }

    fn push(&self, level: LogLevel, text: String) {
        if let Ok(mut g) = self.log.lock() {
            g.push(LogLine { level, text });
        }
    }
}

pub fn describe_outcome(outcome: &CommandOutcome) -> Option<String> {
    match outcome {
        CommandOutcome::InstallPrompt => Some("No injected wallet found".to_owned()),
        CommandOutcome::Connected { accounts } => Some(match accounts.first() {
            Some(account) => format!("Connected {account}"),
            None => "Connected (no accounts shared)".to_owned(),
        }),
        CommandOutcome::Submitted { function, tx_hash } => Some(format!("{function}: {tx_hash}")),
        CommandOutcome::Balance { ether, .. } => Some(format!("Balance: {ether} ETH")),
        CommandOutcome::Skipped => None,
    }
}
