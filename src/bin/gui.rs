#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

//! eframe/egui 기반 입력 폼 GUI 진입점.

use eframe::{egui, App, Frame};
use image::GenericImageView;
use rfd::FileDialog;
use std::{env, fs, path::Path};

use airtight_test_recorder::{
    config,
    delivery::{mail, webhook},
    entry::{self, RawEntry, TestMetadata},
    i18n,
    judgement::{self, Judgement},
    record,
};
use chrono::{Local, NaiveDate};

fn main() -> Result<(), eframe::Error> {
    // CLI 언어 옵션 처리: --lang xx 또는 --lang=xx (xx: auto/ja/en)
    let mut cli_lang: Option<String> = None;
    let args: Vec<String> = env::args().collect();
    let mut i = 1;
    while i < args.len() {
        let a = &args[i];
        if let Some(val) = a.strip_prefix("--lang=") {
            cli_lang = Some(val.to_string());
        } else if a == "--lang" || a == "-L" {
            if i + 1 < args.len() {
                cli_lang = Some(args[i + 1].clone());
                i += 1;
            }
        }
        i += 1;
    }

    let icon_data = load_app_icon();
    let mut viewport = egui::ViewportBuilder::default();
    if let Some(icon) = icon_data {
        viewport = viewport.with_icon(icon);
    }
    let native = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };
    let mut app_cfg = config::load_or_default().unwrap_or_default();
    if let Some(lang_cli) = cli_lang {
        app_cfg.language = i18n::resolve_language(&lang_cli, Some(app_cfg.language.as_str()));
    }
    eframe::run_native(
        "気密試験記録",
        native,
        Box::new(move |cc| {
            if let Err(e) = setup_fonts(&cc.egui_ctx) {
                eprintln!("Font error: {e}");
            }
            Box::new(GuiApp::new(app_cfg.clone()))
        }),
    )
}

fn load_app_icon() -> Option<egui::IconData> {
    let search = ["icon.png", "assets/icon.png", "../icon.png"];
    let path = search
        .iter()
        .find(|p| Path::new(*p).exists())
        .map(|s| s.to_string())?;
    let bytes = fs::read(&path).ok()?;
    let img = image::load_from_memory(&bytes).ok()?;
    let rgba = img.to_rgba8();
    let (w, h) = img.dimensions();
    Some(egui::IconData {
        rgba: rgba.into_raw(),
        width: w,
        height: h,
    })
}

fn apply_font_bytes(ctx: &egui::Context, bytes: Vec<u8>, name: &str) {
    let mut fonts = egui::FontDefinitions::default();
    let font_name = name.to_string();
    fonts
        .font_data
        .insert(font_name.clone(), egui::FontData::from_owned(bytes));
    fonts
        .families
        .entry(egui::FontFamily::Proportional)
        .or_default()
        .insert(0, font_name.clone());
    fonts
        .families
        .entry(egui::FontFamily::Monospace)
        .or_default()
        .insert(0, font_name);
    ctx.set_fonts(fonts);
}

/// 일본어를 표시하기 위해 시스템의 CJK 폰트를 찾아 적용한다.
fn setup_fonts(ctx: &egui::Context) -> Result<(), String> {
    // 1) 프로젝트 내 폰트
    let asset_path = Path::new("assets/fonts/app.ttf");
    if asset_path.exists() {
        let bytes = fs::read(asset_path).map_err(|e| format!("Failed to read font file: {e}"))?;
        apply_font_bytes(ctx, bytes, "app_font");
        return Ok(());
    }

    // 2) 시스템 폰트 탐색 (Windows)
    if let Some(windir) = std::env::var_os("WINDIR") {
        let fonts = Path::new(&windir).join("Fonts");
        let candidates = ["meiryo.ttc", "msgothic.ttc", "YuGothM.ttc", "yugothic.ttf"];
        for cand in candidates {
            let p = fonts.join(cand);
            if p.exists() {
                let bytes = fs::read(&p)
                    .map_err(|e| format!("Failed to read system font ({}): {e}", p.display()))?;
                apply_font_bytes(ctx, bytes, "cjk_font");
                return Ok(());
            }
        }
    }

    // 3) 시스템 폰트 탐색 (Linux/macOS)
    let candidates = [
        "/usr/share/fonts/opentype/noto/NotoSansCJK-Regular.ttc",
        "/usr/share/fonts/truetype/noto/NotoSansCJK-Regular.ttc",
        "/System/Library/Fonts/ヒラギノ角ゴシック W3.ttc",
        "/System/Library/Fonts/Hiragino Sans GB.ttc",
    ];
    for cand in candidates {
        let p = Path::new(cand);
        if p.exists() {
            let bytes = fs::read(p)
                .map_err(|e| format!("Failed to read system font ({}): {e}", p.display()))?;
            apply_font_bytes(ctx, bytes, "cjk_font");
            return Ok(());
        }
    }
    Err("No CJK-capable font found; labels may show as boxes".to_string())
}

/// 판정이 끝난 1건의 결과와 전송용 바이트.
struct RecordOutput {
    judgement: Judgement,
    filename: String,
    bytes: Vec<u8>,
}

struct GuiApp {
    config: config::Config,
    tr: i18n::Translator,
    // 폼 상태
    system_name: String,
    target_test_pressure: String,
    test_range: String,
    test_medium: String,
    holding_duration: String,
    gauge_no: String,
    measurement_location: String,
    tester: String,
    start_date: String,
    start_hour: String,
    start_minute: String,
    end_date: String,
    end_hour: String,
    end_minute: String,
    start_pressure: String,
    start_temperature: String,
    end_pressure: String,
    end_temperature: String,
    // 결과/상태
    output: Option<RecordOutput>,
    status: Option<String>,
}

impl GuiApp {
    fn new(config: config::Config) -> Self {
        let lang_code = i18n::resolve_language("auto", Some(config.language.as_str()));
        let tr = i18n::Translator::new_with_pack(&lang_code, None);
        let today = Local::now().date_naive().format("%Y-%m-%d").to_string();
        Self {
            config,
            tr,
            system_name: String::new(),
            target_test_pressure: String::new(),
            test_range: String::new(),
            test_medium: String::new(),
            holding_duration: String::new(),
            gauge_no: String::new(),
            measurement_location: String::new(),
            tester: String::new(),
            start_date: today.clone(),
            start_hour: "9".to_string(),
            start_minute: "0".to_string(),
            end_date: today,
            end_hour: "10".to_string(),
            end_minute: "0".to_string(),
            start_pressure: String::new(),
            start_temperature: String::new(),
            end_pressure: String::new(),
            end_temperature: String::new(),
            output: None,
            status: None,
        }
    }

    fn parse_date(&self, raw: &str) -> Option<NaiveDate> {
        let trimmed = raw.trim();
        NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
            .or_else(|_| NaiveDate::parse_from_str(trimmed, "%Y/%m/%d"))
            .ok()
    }

    /// 폼 내용을 검증/판정하고 기록지 바이트를 만든다.
    fn judge_and_build(&mut self) {
        self.output = None;
        let (start_date, end_date) =
            match (self.parse_date(&self.start_date), self.parse_date(&self.end_date)) {
                (Some(s), Some(e)) => (s, e),
                _ => {
                    self.status = Some(self.tr.t(i18n::keys::ERROR_INVALID_DATE).to_string());
                    return;
                }
            };
        let raw = RawEntry {
            metadata: TestMetadata {
                system_name: self.system_name.trim().to_string(),
                target_test_pressure: self.target_test_pressure.trim().to_string(),
                test_range: self.test_range.trim().to_string(),
                test_medium: self.test_medium.trim().to_string(),
                holding_duration: self.holding_duration.trim().to_string(),
                gauge_no: self.gauge_no.trim().to_string(),
                measurement_location: self.measurement_location.trim().to_string(),
                tester: self.tester.trim().to_string(),
            },
            start_date,
            start_hour: self.start_hour.clone(),
            start_minute: self.start_minute.clone(),
            end_date,
            end_hour: self.end_hour.clone(),
            end_minute: self.end_minute.clone(),
            start_pressure: self.start_pressure.clone(),
            start_temperature: self.start_temperature.clone(),
            end_pressure: self.end_pressure.clone(),
            end_temperature: self.end_temperature.clone(),
        };

        let measurement = match entry::validate(raw) {
            Ok(m) => m,
            Err(e) => {
                self.status = Some(format!("{}: {e}", self.tr.t(i18n::keys::WARN_PREFIX)));
                return;
            }
        };
        let judgement = judgement::judge(&measurement, self.config.tolerance_policy);
        if !judgement.is_finite() {
            self.status = Some(self.tr.t(i18n::keys::WARN_NOT_FINITE).to_string());
            return;
        }

        let built = record::load_template(Path::new(&self.config.template_path))
            .and_then(|mut book| {
                record::write_record(&mut book, &measurement, &judgement)?;
                record::to_bytes(&book)
            });
        match built {
            Ok(bytes) => {
                let filename = record::stamped_filename(Local::now().naive_local());
                self.status = None;
                self.output = Some(RecordOutput {
                    judgement,
                    filename,
                    bytes,
                });
            }
            Err(e) => {
                self.status = Some(format!("{}: {e}", self.tr.t(i18n::keys::ERROR_PREFIX)));
            }
        }
    }

    fn save_output(&mut self) {
        let Some(output) = &self.output else {
            return;
        };
        let picked = FileDialog::new()
            .set_file_name(&output.filename)
            .add_filter("Excel", &["xlsx"])
            .save_file();
        if let Some(path) = picked {
            self.status = Some(match fs::write(&path, &output.bytes) {
                Ok(()) => format!(
                    "{} {}",
                    self.tr.t(i18n::keys::RECORD_SAVED),
                    path.display()
                ),
                Err(e) => format!("{}: {e}", self.tr.t(i18n::keys::ERROR_PREFIX)),
            });
        }
    }

    fn send_webhook(&mut self) {
        let Some(output) = &self.output else {
            return;
        };
        let Some(settings) = &self.config.delivery.webhook else {
            return;
        };
        self.status = Some(
            match webhook::post_record(settings, &output.filename, output.bytes.clone()) {
                Ok(()) => self.tr.t(i18n::keys::DELIVERY_WEBHOOK_OK).to_string(),
                Err(e) => format!("{} {e}", self.tr.t(i18n::keys::DELIVERY_FAILED)),
            },
        );
    }

    fn send_mail(&mut self) {
        let Some(output) = &self.output else {
            return;
        };
        let Some(settings) = &self.config.delivery.mail else {
            return;
        };
        let summary = output.judgement.summary_text();
        self.status = Some(
            match mail::send_record(settings, &summary, &output.filename, output.bytes.clone()) {
                Ok(()) => self.tr.t(i18n::keys::DELIVERY_MAIL_OK).to_string(),
                Err(e) => format!("{} {e}", self.tr.t(i18n::keys::DELIVERY_FAILED)),
            },
        );
    }
}

impl App for GuiApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut Frame) {
        let tr = self.tr.clone();
        let txt =
            move |key: &str, default: &str| tr.lookup(key).unwrap_or_else(|| default.to_string());

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.heading(txt("gui.title", "気密試験記録 入力フォーム"));
                ui.separator();

                egui::Grid::new("metadata_grid")
                    .num_columns(2)
                    .spacing([12.0, 6.0])
                    .show(ui, |ui| {
                        let fields = [
                            ("gui.system_name", "系統名", &mut self.system_name),
                            (
                                "gui.target_test_pressure",
                                "試験圧力 (MPa)",
                                &mut self.target_test_pressure,
                            ),
                            ("gui.test_range", "試験範囲", &mut self.test_range),
                            ("gui.test_medium", "試験媒体", &mut self.test_medium),
                            (
                                "gui.holding_duration",
                                "放置時間 (h)",
                                &mut self.holding_duration,
                            ),
                            ("gui.gauge_no", "使用圧力計機器No.", &mut self.gauge_no),
                            (
                                "gui.measurement_location",
                                "測定場所",
                                &mut self.measurement_location,
                            ),
                            ("gui.tester", "試験実施者", &mut self.tester),
                        ];
                        for (key, default, value) in fields {
                            ui.label(txt(key, default));
                            ui.text_edit_singleline(value);
                            ui.end_row();
                        }
                    });

                ui.separator();
                ui.strong(txt("gui.start", "開始日時"));
                ui.horizontal(|ui| {
                    ui.label(txt("gui.date", "日付"));
                    ui.text_edit_singleline(&mut self.start_date);
                    ui.label(txt("gui.hour", "時"));
                    ui.add(egui::TextEdit::singleline(&mut self.start_hour).desired_width(40.0));
                    ui.label(txt("gui.minute", "分"));
                    ui.add(egui::TextEdit::singleline(&mut self.start_minute).desired_width(40.0));
                });
                ui.strong(txt("gui.end", "終了日時"));
                ui.horizontal(|ui| {
                    ui.label(txt("gui.date", "日付"));
                    ui.text_edit_singleline(&mut self.end_date);
                    ui.label(txt("gui.hour", "時"));
                    ui.add(egui::TextEdit::singleline(&mut self.end_hour).desired_width(40.0));
                    ui.label(txt("gui.minute", "分"));
                    ui.add(egui::TextEdit::singleline(&mut self.end_minute).desired_width(40.0));
                });

                ui.separator();
                ui.strong(txt("gui.measurements", "測定値入力"));
                egui::Grid::new("measure_grid")
                    .num_columns(2)
                    .spacing([12.0, 6.0])
                    .show(ui, |ui| {
                        let fields = [
                            (
                                "gui.start_pressure",
                                "開始圧力 (MPa)",
                                &mut self.start_pressure,
                            ),
                            (
                                "gui.start_temperature",
                                "開始温度 (℃)",
                                &mut self.start_temperature,
                            ),
                            ("gui.end_pressure", "終了圧力 (MPa)", &mut self.end_pressure),
                            (
                                "gui.end_temperature",
                                "終了温度 (℃)",
                                &mut self.end_temperature,
                            ),
                        ];
                        for (key, default, value) in fields {
                            ui.label(txt(key, default));
                            ui.text_edit_singleline(value);
                            ui.end_row();
                        }
                    });

                ui.separator();
                if ui.button(txt("gui.judge_save", "判定・保存")).clicked() {
                    self.judge_and_build();
                }

                if let Some(j) = self.output.as_ref().map(|o| o.judgement) {
                    ui.separator();
                    ui.strong(txt(
                        "gui.result_heading",
                        "計算結果（ボイル・シャルルの法則に基づく補正）",
                    ));
                    ui.label(format!(
                        "P2_corr: {} MPa",
                        judgement::format_pressure(j.corrected_end_pressure_mpa)
                    ));
                    ui.label(format!(
                        "ΔP: {} MPa",
                        judgement::format_pressure(j.delta_pressure_mpa)
                    ));
                    ui.label(format!(
                        "判定範囲: {} MPa",
                        judgement::format_tolerance(j.tolerance_band_mpa)
                    ));
                    let color = if j.pass {
                        egui::Color32::GREEN
                    } else {
                        egui::Color32::RED
                    };
                    ui.colored_label(
                        color,
                        format!("{} {}", txt("gui.verdict", "判定結果:"), j.verdict_label()),
                    );

                    ui.horizontal(|ui| {
                        if ui.button(txt("gui.save_as", "保存先を選択")).clicked() {
                            self.save_output();
                        }
                        if self.config.delivery.webhook.is_some()
                            && ui.button(txt("gui.send_webhook", "Webhook送信")).clicked()
                        {
                            self.send_webhook();
                        }
                        if self.config.delivery.mail.is_some()
                            && ui.button(txt("gui.send_mail", "メール送信")).clicked()
                        {
                            self.send_mail();
                        }
                    });
                }

                if let Some(status) = &self.status {
                    ui.separator();
                    ui.label(status.clone());
                }
            });
        });
    }
}
