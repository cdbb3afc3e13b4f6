//! Main window: four buttons, the amount input and the log.

use eframe::egui;

use fund_me_adapters::FundMeConfig;
use fund_me_core::ControllerCommand;

use crate::bridge::{ControllerBridge, LogLevel};

pub struct App {
    bridge: ControllerBridge,
    /// ETH amount input
    eth_amount: String,
}

impl App {
    pub fn new(_cc: &eframe::CreationContext<'_>, config: FundMeConfig) -> Self {
        tracing::info!(
            contract = %config.contract_address,
            rpc_url = %config.rpc_url,
            "fund-me shell started"
        );
        Self {
            bridge: ControllerBridge::new(config),
            eth_amount: String::new(),
        }
    }
}

impl eframe::App for App {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        ctx.set_visuals(egui::Visuals::dark());

        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            ui.add_space(8.0);
            ui.horizontal(|ui| {
                ui.heading(
                    egui::RichText::new("Fund Me")
                        .size(22.0)
                        .color(egui::Color32::from_rgb(0, 212, 170)),
                );
                if self.bridge.in_flight() > 0 {
                    ui.add_space(10.0);
                    ui.spinner();
                }
            });
            ui.add_space(4.0);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.add_space(10.0);
            ui.horizontal(|ui| {
                if ui.button(self.bridge.connect_label()).clicked() {
                    self.bridge.dispatch(ControllerCommand::Connect, ctx);
                }
                if ui.button("Get Balance").clicked() {
                    self.bridge.dispatch(ControllerCommand::GetBalance, ctx);
                }
                if ui.button("Withdraw").clicked() {
                    self.bridge.dispatch(ControllerCommand::Withdraw, ctx);
                }
            });

            ui.add_space(10.0);
            ui.horizontal(|ui| {
                ui.label("ETH Amount:");
                ui.add(
                    egui::TextEdit::singleline(&mut self.eth_amount)
                        .hint_text("0.1")
                        .desired_width(120.0),
                );
                if ui.button("Fund").clicked() {
                    self.bridge.dispatch(
                        ControllerCommand::Fund {
                            amount: self.eth_amount.clone(),
                        },
                        ctx,
                    );
                }
            });

            ui.add_space(15.0);
            ui.separator();
            ui.label(egui::RichText::new("Log").strong());
            egui::ScrollArea::vertical()
                .stick_to_bottom(true)
                .show(ui, |ui| {
                    for line in self.bridge.log_lines() {
                        let text = egui::RichText::new(line.text).monospace();
                        match line.level {
                            LogLevel::Info => ui.label(text),
                            LogLevel::Error => ui.label(text.color(egui::Color32::LIGHT_RED)),
                        };
                    }
                });
        });
    }
}
