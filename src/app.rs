use chrono::Utc;
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;

use crate::config::{self, Config, OutputFormat, UnitSystem};
use crate::conversion::{self, ConversionError};
use crate::form::{self, FormError};
use crate::gas::meter_allowance::MeterSelection;
use crate::gas::procedure::{self, PurgeRequest, TestPlanOutcome};
use crate::gas::reference_data::{ReferenceTables, RejectedRow, TableId};
use crate::gas::segment_volume::PipeSegment;
use crate::gas::test_plan::TestPlanInput;
use crate::gas::totals::{compute_totals, TotalsInput};
use crate::gas::SizingError;
use crate::i18n::{self, keys, Translator};
use crate::report::{self, TextRenderer};
use crate::ui_cli;
use crate::units::{to_celsius, to_cubic_meter, to_mbar, to_metre};

/// 애플리케이션 실행 중 발생 가능한 오류를 표현한다.
#[derive(Debug)]
pub enum AppError {
    /// 파일 입출력 오류
    Io(std::io::Error),
    /// 설정 저장/로드 오류
    Config(config::ConfigError),
    /// 단위 변환 오류
    Conversion(ConversionError),
    /// 체적 산정 오류 (알 수 없는 배관/계량기 ID 등)
    Sizing(SizingError),
    /// 폼 파일 오류
    Form(FormError),
    /// JSON 출력 오류
    Json(serde_json::Error),
    /// 명령행 값 형식 오류
    InvalidArgument(String),
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppError::Io(e) => write!(f, "I/O error: {e}"),
            AppError::Config(e) => write!(f, "{e}"),
            AppError::Conversion(e) => write!(f, "unit conversion error: {e}"),
            AppError::Sizing(e) => write!(f, "sizing error: {e}"),
            AppError::Form(e) => write!(f, "{e}"),
            AppError::Json(e) => write!(f, "JSON output error: {e}"),
            AppError::InvalidArgument(msg) => write!(f, "invalid argument: {msg}"),
        }
    }
}

impl std::error::Error for AppError {}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        AppError::Io(value)
    }
}

impl From<config::ConfigError> for AppError {
    fn from(value: config::ConfigError) -> Self {
        AppError::Config(value)
    }
}

impl From<ConversionError> for AppError {
    fn from(value: ConversionError) -> Self {
        AppError::Conversion(value)
    }
}

impl From<SizingError> for AppError {
    fn from(value: SizingError) -> Self {
        AppError::Sizing(value)
    }
}

impl From<FormError> for AppError {
    fn from(value: FormError) -> Self {
        AppError::Form(value)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(value: serde_json::Error) -> Self {
        AppError::Json(value)
    }
}

#[derive(Parser, Debug)]
#[command(name = "igem_up1_toolbox")]
#[command(version)]
#[command(about = "IGEM/UP/1 pipework volume, test pressure and purge calculator")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output language (auto, en, ko). Uses config value if not specified.
    #[arg(long, global = true)]
    pub lang: Option<String>,

    /// Path to config.toml
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format (table, json). Uses config value if not specified.
    #[arg(long, short = 'f', global = true)]
    pub format: Option<OutputFormat>,

    /// Debug logging on stderr
    #[arg(long, short = 'v', global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only log errors
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Directory holding <lang>.toml translation packs (default: ./locales)
    #[arg(long, global = true)]
    pub locales: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Installation and purge volume totals for a pipe schedule
    Totals {
        /// Pipe section as SIZE=LENGTH (e.g. DN50=12.5), repeatable
        #[arg(long = "pipe", value_name = "SIZE=LENGTH")]
        pipes: Vec<String>,

        /// Purge hose as SIZE=LENGTH
        #[arg(long, value_name = "SIZE=LENGTH")]
        hose: Option<String>,

        /// Diaphragm meter id (e.g. U6)
        #[arg(long)]
        diaphragm: Option<String>,

        /// Rotary meter id (e.g. DN50)
        #[arg(long)]
        rotary: Option<String>,

        /// Purge multiplier override (default 1.5)
        #[arg(long, allow_hyphen_values = true)]
        purge_multiplier: Option<f64>,

        /// Unit of the lengths (m, mm, cm, ft)
        #[arg(long)]
        length_unit: Option<String>,
    },

    /// Strength/tightness test pressures, hold and stabilisation times
    TestPlan {
        #[arg(long, allow_hyphen_values = true)]
        design_pressure: Option<f64>,

        #[arg(long, allow_hyphen_values = true)]
        operating_pressure: Option<f64>,

        /// Estimated system volume
        #[arg(long)]
        volume: Option<f64>,

        /// Expected fill rate [m³/h]
        #[arg(long)]
        fill_rate: Option<f64>,

        #[arg(long, allow_hyphen_values = true)]
        start_temp: Option<f64>,

        #[arg(long, allow_hyphen_values = true)]
        end_temp: Option<f64>,

        #[arg(long)]
        pressure_unit: Option<String>,

        #[arg(long)]
        volume_unit: Option<String>,

        #[arg(long)]
        temperature_unit: Option<String>,
    },

    /// Purge duration, gas factors, gauge and time-to-detect chain
    Purge {
        /// Total purge volume
        #[arg(long)]
        volume: f64,

        /// Largest pipe size for the Table 12 purge flow (e.g. DN100)
        #[arg(long)]
        pipe_size: Option<String>,

        /// Gas family (e.g. Natural)
        #[arg(long)]
        gas: Option<String>,

        /// Gauge name from Table 6
        #[arg(long)]
        gauge: Option<String>,

        /// Room volume for Type A areas
        #[arg(long)]
        room_volume: Option<f64>,

        #[arg(long)]
        volume_unit: Option<String>,
    },

    /// Evaluate a saved procedure form
    Evaluate {
        /// Procedure JSON file
        form: PathBuf,
    },

    /// Enter a new procedure interactively and save it
    NewForm {
        /// Output JSON file
        output: PathBuf,
    },

    /// Re-export a procedure with a fresh metadata stamp
    Export {
        input: PathBuf,
        output: PathBuf,
    },

    /// Print the reference tables
    Tables {
        /// Table key (diaphragm-meters, rotary-meters, pipes, gauges, purge-factors, gas-f1, gas-f3)
        name: Option<String>,
    },

    /// Convert a value between units
    Convert {
        /// pressure, volume, length, temperature, temperature-diff
        kind: String,
        #[arg(allow_hyphen_values = true)]
        value: f64,
        from: String,
        /// Target unit; defaults to the calculation base unit (mbar, m³, m, °C)
        to: Option<String>,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,
    /// Switch the unit-system preset
    Units { system: UnitSystem },
    /// Set the output language (auto, en, ko)
    Language { code: String },
}

/// 실행 문맥. 설정, 번역기, 참조표, 출력 형식을 묶는다.
struct Context<'a> {
    config: Config,
    config_path: PathBuf,
    tr: Translator,
    tables: &'a ReferenceTables,
    format: OutputFormat,
}

impl Context<'_> {
    fn renderer(&self) -> TextRenderer<'_> {
        TextRenderer::new(&self.tr, self.config.default_units)
    }

    fn emit<T: Serialize>(&self, value: &T, text: impl FnOnce() -> String) -> Result<(), AppError> {
        match self.format {
            OutputFormat::Json => println!("{}", report::to_json(value)?),
            OutputFormat::Table => print!("{}", text()),
        }
        Ok(())
    }
}

/// `-v`/`-q` 플래그에 대응하는 로그 레벨. 기본은 경고까지.
pub fn log_level(verbose: bool, quiet: bool) -> log::LevelFilter {
    if verbose {
        log::LevelFilter::Debug
    } else if quiet {
        log::LevelFilter::Error
    } else {
        log::LevelFilter::Warn
    }
}

/// 명령 하나를 실행한다.
pub fn run(cli: Cli) -> Result<(), AppError> {
    let config_path = config::config_path(cli.config.as_deref());
    let config = config::load_or_default_at(&config_path)?;
    let lang = i18n::resolve_language(cli.lang.as_deref(), config.language_preference());
    let format = cli.format.unwrap_or(config.output_format);
    let mut ctx = Context {
        tr: Translator::new_with_pack(&lang, cli.locales.as_deref()),
        config,
        config_path,
        tables: ReferenceTables::builtin(),
        format,
    };
    log::debug!(
        "language={}, format={format:?}, data={}",
        ctx.tr.language_code(),
        ctx.tables.version()
    );

    match cli.command {
        Commands::Totals {
            pipes,
            hose,
            diaphragm,
            rotary,
            purge_multiplier,
            length_unit,
        } => {
            let unit = match length_unit {
                Some(u) => conversion::parse_length_unit(&u)?,
                None => ctx.config.default_units.length,
            };
            let input = TotalsInput {
                pipes: pipes
                    .iter()
                    .map(|p| parse_segment_arg(p, unit))
                    .collect::<Result<Vec<_>, _>>()?,
                purge_hose: hose.as_deref().map(|h| parse_segment_arg(h, unit)).transpose()?,
                diaphragm: diaphragm.as_deref().map(MeterSelection::parse).unwrap_or_default(),
                rotary: rotary.as_deref().map(MeterSelection::parse).unwrap_or_default(),
                purge_multiplier,
            };
            let totals = compute_totals(ctx.tables, &input)?;
            ctx.emit(&totals, || ctx.renderer().totals(&totals))
        }
        Commands::TestPlan {
            design_pressure,
            operating_pressure,
            volume,
            fill_rate,
            start_temp,
            end_temp,
            pressure_unit,
            volume_unit,
            temperature_unit,
        } => {
            let units = ctx.config.default_units;
            let p_unit = match pressure_unit {
                Some(u) => conversion::parse_pressure_unit(&u)?,
                None => units.pressure,
            };
            let v_unit = match volume_unit {
                Some(u) => conversion::parse_volume_unit(&u)?,
                None => units.volume,
            };
            let t_unit = match temperature_unit {
                Some(u) => conversion::parse_temperature_unit(&u)?,
                None => units.temperature,
            };
            let input = TestPlanInput {
                design_pressure_mbar: design_pressure.map(|p| to_mbar(p, p_unit)),
                operating_pressure_mbar: operating_pressure.map(|p| to_mbar(p, p_unit)),
                system_volume_m3: volume.map(|v| to_cubic_meter(v, v_unit)),
                fill_rate_m3_per_h: fill_rate,
                start_temp_c: start_temp.map(|t| to_celsius(t, t_unit)),
                end_temp_c: end_temp.map(|t| to_celsius(t, t_unit)),
            };
            let outcome = procedure::plan_outcome(&input);
            let out = PlanOutput {
                input: &input,
                test_plan: &outcome,
            };
            ctx.emit(&out, || ctx.renderer().test_plan(&input, None, &outcome))
        }
        Commands::Purge {
            volume,
            pipe_size,
            gas,
            gauge,
            room_volume,
            volume_unit,
        } => {
            let v_unit = match volume_unit {
                Some(u) => conversion::parse_volume_unit(&u)?,
                None => ctx.config.default_units.volume,
            };
            let request = PurgeRequest {
                purge_pipe_size: pipe_size,
                gas_family: gas,
                gauge,
                room_volume_m3: room_volume.map(|r| to_cubic_meter(r, v_unit)),
            };
            let summary =
                procedure::summarize_purge(ctx.tables, to_cubic_meter(volume, v_unit), &request);
            ctx.emit(&summary, || ctx.renderer().purge(&summary))
        }
        Commands::Evaluate { form: path } => {
            let imported = form::load_form(&path)?;
            if let Some(meta) = &imported.metadata {
                log::info!(
                    "form exported by v{} with data {} at {}",
                    meta.app_version,
                    meta.data_version,
                    meta.exported_at
                );
            }
            let report = procedure::evaluate(ctx.tables, &imported.snapshot)?;
            ctx.emit(&report, || ctx.renderer().procedure(&report))
        }
        Commands::NewForm { output } => {
            let snapshot = ui_cli::new_form_wizard(&ctx.tr, ctx.tables)?;
            form::save_form(&output, &snapshot, Utc::now())?;
            println!("{}: {}", ctx.tr.t(keys::SAVED_TO), output.display());
            let report = procedure::evaluate(ctx.tables, &snapshot)?;
            ctx.emit(&report, || ctx.renderer().procedure(&report))
        }
        Commands::Export { input, output } => {
            let imported = form::load_form(&input)?;
            form::save_form(&output, &imported.snapshot, Utc::now())?;
            println!("{}: {}", ctx.tr.t(keys::SAVED_TO), output.display());
            Ok(())
        }
        Commands::Tables { name } => {
            let which = match name {
                Some(n) => Some(TableId::from_key(&n).ok_or_else(|| {
                    AppError::InvalidArgument(format!("unknown table '{n}'"))
                })?),
                None => None,
            };
            let rejected = ReferenceTables::builtin_rejected();
            let json = tables_json(ctx.tables, which, rejected);
            ctx.emit(&json, || {
                let renderer = ctx.renderer();
                let mut text = renderer.tables(ctx.tables, which);
                text.push_str(&renderer.rejected_rows(rejected));
                text
            })
        }
        Commands::Convert {
            kind,
            value,
            from,
            to,
        } => {
            let kind = conversion::parse_quantity_kind(&kind)?;
            let to = to.unwrap_or_else(|| kind.canonical_symbol().to_string());
            let result = conversion::convert(kind, value, &from, &to)?;
            let json = serde_json::json!({ "value": result, "unit": &to });
            ctx.emit(&json, || format!("{} {to}\n", report::num(result, 6)))
        }
        Commands::Config { action } => {
            match action {
                ConfigAction::Show => {}
                ConfigAction::Units { system } => {
                    ctx.config.apply_unit_system(system);
                    ctx.config.save_to(&ctx.config_path)?;
                    println!("{}", ctx.tr.t(keys::CONFIG_SAVED));
                }
                ConfigAction::Language { code } => {
                    ctx.config.set_language(&code)?;
                    ctx.config.save_to(&ctx.config_path)?;
                    println!("{}", ctx.tr.t(keys::CONFIG_SAVED));
                }
            }
            ctx.emit(&ctx.config, || config_text(&ctx.tr, &ctx.config))
        }
    }
}

#[derive(Serialize)]
struct PlanOutput<'a> {
    input: &'a TestPlanInput,
    test_plan: &'a TestPlanOutcome,
}

/// `SIZE=LENGTH` 를 배관 구간으로 바꾼다. 크기에 공백이 있어도 마지막 `=` 로 나눈다.
pub fn parse_segment_arg(arg: &str, unit: crate::units::LengthUnit) -> Result<PipeSegment, AppError> {
    let (size, length) = arg
        .rsplit_once('=')
        .ok_or_else(|| AppError::InvalidArgument(format!("expected SIZE=LENGTH, got '{arg}'")))?;
    let size = size.trim();
    if size.is_empty() {
        return Err(AppError::InvalidArgument(format!("missing size in '{arg}'")));
    }
    let length = form::parse_number(length).ok_or_else(|| {
        AppError::InvalidArgument(format!("'{}' is not a length", length.trim()))
    })?;
    Ok(PipeSegment::new(size, to_metre(length, unit)))
}

fn tables_json(
    tables: &ReferenceTables,
    which: Option<TableId>,
    rejected: &[RejectedRow],
) -> serde_json::Value {
    use crate::gas::reference_data::MeterKind;
    let mut map = serde_json::Map::new();
    map.insert("version".into(), tables.version().into());
    if !rejected.is_empty() {
        map.insert(
            "rejected".into(),
            serde_json::to_value(rejected).unwrap_or(serde_json::Value::Null),
        );
    }
    let selected: Vec<TableId> = which.map(|w| vec![w]).unwrap_or_else(|| TableId::ALL.to_vec());
    for id in selected {
        let rows = match id {
            TableId::DiaphragmMeters => serde_json::to_value(tables.meters(MeterKind::Diaphragm)),
            TableId::RotaryMeters => serde_json::to_value(tables.meters(MeterKind::Rotary)),
            TableId::PipesAndHoses => serde_json::to_value(tables.segments()),
            TableId::Gauges => serde_json::to_value(tables.gauges()),
            TableId::PurgeFactors => serde_json::to_value(tables.purge_factors()),
            TableId::GasFactorsF1 | TableId::GasFactorsF3 => {
                serde_json::to_value(tables.gas_factors())
            }
        };
        let rows = rows.unwrap_or_else(|e| {
            log::warn!("could not serialise table {}: {e}", id.key());
            serde_json::Value::Null
        });
        map.insert(
            id.key().into(),
            serde_json::json!({ "title": id.title(), "summary": id.summary(), "rows": rows }),
        );
    }
    serde_json::Value::Object(map)
}

fn config_text(tr: &Translator, cfg: &Config) -> String {
    let u = cfg.default_units;
    format!(
        "{}: {}\n{}: {:?}\n{}: {:?}\n{}: {} / {} / {} / {}\n",
        tr.t(keys::CONFIG_LANGUAGE),
        cfg.language,
        tr.t(keys::CONFIG_UNIT_SYSTEM),
        cfg.unit_system,
        tr.t(keys::CONFIG_OUTPUT_FORMAT),
        cfg.output_format,
        tr.t(keys::CONFIG_DEFAULT_UNITS),
        u.pressure.symbol(),
        u.volume.symbol(),
        u.length.symbol(),
        u.temperature.symbol()
    )
}
