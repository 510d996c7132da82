use std::collections::HashMap;
use std::fs;
use std::path::Path;
use sys_locale::get_locale;

/// 문자열 키를 모아두는 네임스페이스.
pub mod keys {
    pub const NOT_PROVIDED: &str = "general.not_provided";
    pub const SAVED_TO: &str = "general.saved_to";

    pub const SECTION_INITIAL_DATA: &str = "report.initial_data";
    pub const SECTION_CALCULATIONS: &str = "report.calculations";
    pub const SECTION_RESULTS: &str = "report.results";
    pub const DATA_VERSION: &str = "report.data_version";
    pub const WARNINGS: &str = "report.warnings";

    pub const TOTALS_HEADING: &str = "totals.heading";
    pub const TOTALS_MULTIPLIER: &str = "totals.multiplier";
    pub const TOTALS_MULTIPLIER_DEFAULT: &str = "totals.multiplier_default";
    pub const TOTALS_MULTIPLIER_OVERRIDE: &str = "totals.multiplier_override";
    pub const TOTALS_MULTIPLIER_SUBSTITUTED: &str = "totals.multiplier_substituted";
    pub const TOTALS_SEGMENTS: &str = "totals.segments";
    pub const TOTALS_NO_SEGMENTS: &str = "totals.no_segments";
    pub const TOTALS_HOSE: &str = "totals.hose";
    pub const TOTALS_DIAPHRAGM: &str = "totals.diaphragm";
    pub const TOTALS_ROTARY: &str = "totals.rotary";
    pub const TOTALS_NO_METER: &str = "totals.no_meter";
    pub const TOTALS_INSTALL: &str = "totals.install";
    pub const TOTALS_PURGE: &str = "totals.purge";
    pub const TOTALS_WARNING_MULTIPLIER: &str = "totals.warning_multiplier";

    pub const PLAN_HEADING: &str = "plan.heading";
    pub const PLAN_INSUFFICIENT_PRESSURE: &str = "plan.insufficient_pressure";
    pub const PLAN_INSUFFICIENT_VOLUME: &str = "plan.insufficient_volume";
    pub const PLAN_ROW_DESIGN: &str = "plan.row_design";
    pub const PLAN_ROW_OPERATING: &str = "plan.row_operating";
    pub const PLAN_ROW_VOLUME: &str = "plan.row_volume";
    pub const PLAN_ROW_FILL_RATE: &str = "plan.row_fill_rate";
    pub const PLAN_ROW_START_TEMP: &str = "plan.row_start_temp";
    pub const PLAN_ROW_END_TEMP: &str = "plan.row_end_temp";
    pub const PLAN_VOLUME_ENTERED: &str = "plan.volume_entered";
    pub const PLAN_VOLUME_ESTIMATED: &str = "plan.volume_estimated";
    pub const PLAN_DESIGN_FALLBACK: &str = "plan.design_fallback";
    pub const PLAN_ALGORITHM_LOW: &str = "plan.algorithm_low";
    pub const PLAN_ALGORITHM_HIGH: &str = "plan.algorithm_high";
    pub const PLAN_STEP_CATEGORY: &str = "plan.step_category";
    pub const PLAN_STEP_STRENGTH: &str = "plan.step_strength";
    pub const PLAN_STEP_TIGHTNESS_LOW: &str = "plan.step_tightness_low";
    pub const PLAN_STEP_TIGHTNESS_HIGH: &str = "plan.step_tightness_high";
    pub const PLAN_STEP_HOLD: &str = "plan.step_hold";
    pub const PLAN_STEP_STABILISATION: &str = "plan.step_stabilisation";
    pub const PLAN_STEP_STABILISATION_MISSING: &str = "plan.step_stabilisation_missing";
    pub const PLAN_STEP_TEMPERATURE: &str = "plan.step_temperature";
    pub const PLAN_STEP_TEMPERATURE_MISSING: &str = "plan.step_temperature_missing";
    pub const PLAN_RESULT_STRENGTH: &str = "plan.result_strength";
    pub const PLAN_RESULT_TIGHTNESS: &str = "plan.result_tightness";
    pub const PLAN_RESULT_HOLD: &str = "plan.result_hold";
    pub const PLAN_RESULT_STABILISATION: &str = "plan.result_stabilisation";
    pub const PLAN_RESULT_TEMPERATURE: &str = "plan.result_temperature";
    pub const PLAN_TEMP_STEADY: &str = "plan.temp_steady";
    pub const PLAN_TEMP_RISE: &str = "plan.temp_rise";
    pub const PLAN_TEMP_FALL: &str = "plan.temp_fall";

    pub const PURGE_HEADING: &str = "purge.heading";
    pub const PURGE_PIPE_SIZE: &str = "purge.pipe_size";
    pub const PURGE_VOLUME: &str = "purge.volume";
    pub const PURGE_DURATION: &str = "purge.duration";
    pub const PURGE_GAS_FAMILY: &str = "purge.gas_family";
    pub const PURGE_UNKNOWN_GAS: &str = "purge.unknown_gas";
    pub const PURGE_GAUGE: &str = "purge.gauge";
    pub const PURGE_UNKNOWN_GAUGE: &str = "purge.unknown_gauge";
    pub const PURGE_TTD_HEADING: &str = "purge.ttd_heading";
    pub const PURGE_TTD_BASE: &str = "purge.ttd_base";
    pub const PURGE_TTD_EXISTING_CD: &str = "purge.ttd_existing_cd";
    pub const PURGE_TTD_TYPE_A: &str = "purge.ttd_type_a";
    pub const PURGE_TTD_MISSING: &str = "purge.ttd_missing";
    pub const PURGE_GAS: &str = "purge.gas";
    pub const PURGE_NITROGEN: &str = "purge.nitrogen";

    pub const WIZARD_HEADING: &str = "wizard.heading";
    pub const WIZARD_HINT_BLANK: &str = "wizard.hint_blank";
    pub const WIZARD_PIPE_SIZE: &str = "wizard.pipe_size";
    pub const WIZARD_PIPE_LENGTH: &str = "wizard.pipe_length";
    pub const WIZARD_HOSE_SIZE: &str = "wizard.hose_size";
    pub const WIZARD_HOSE_LENGTH: &str = "wizard.hose_length";
    pub const WIZARD_DIAPHRAGM: &str = "wizard.diaphragm";
    pub const WIZARD_ROTARY: &str = "wizard.rotary";
    pub const WIZARD_MULTIPLIER: &str = "wizard.multiplier";
    pub const WIZARD_DESIGN_PRESSURE: &str = "wizard.design_pressure";
    pub const WIZARD_OPERATING_PRESSURE: &str = "wizard.operating_pressure";
    pub const WIZARD_VOLUME: &str = "wizard.volume";
    pub const WIZARD_FILL_RATE: &str = "wizard.fill_rate";
    pub const WIZARD_START_TEMP: &str = "wizard.start_temp";
    pub const WIZARD_END_TEMP: &str = "wizard.end_temp";
    pub const WIZARD_GAS_TYPE: &str = "wizard.gas_type";
    pub const WIZARD_GAUGE: &str = "wizard.gauge";
    pub const WIZARD_ROOM_VOLUME: &str = "wizard.room_volume";
    pub const WIZARD_PURGE_PIPE: &str = "wizard.purge_pipe";
    pub const WIZARD_UNKNOWN_ID: &str = "wizard.unknown_id";

    pub const ERROR_INVALID_NUMBER: &str = "error.invalid_number";

    pub const CONFIG_LANGUAGE: &str = "config.language";
    pub const CONFIG_UNIT_SYSTEM: &str = "config.unit_system";
    pub const CONFIG_OUTPUT_FORMAT: &str = "config.output_format";
    pub const CONFIG_DEFAULT_UNITS: &str = "config.default_units";
    pub const CONFIG_SAVED: &str = "config.saved";

    pub const TABLES_REJECTED: &str = "tables.rejected";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    En,
    Ko,
}

impl Language {
    fn from_code(code: &str) -> Self {
        let c = code.to_lowercase();
        if c.starts_with("ko") {
            Language::Ko
        } else {
            Language::En
        }
    }

    pub fn as_code(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Ko => "ko",
        }
    }
}

/// 런타임 언어 번들을 제공한다.
#[derive(Debug, Clone)]
pub struct Translator {
    lang: Language,
    overrides: Option<HashMap<String, String>>,
}

impl Translator {
    /// 언어 코드(en/ko)에 따라 번역기를 생성한다. 알 수 없는 코드는 en으로 폴백한다.
    pub fn new(lang_code: &str) -> Self {
        Self {
            lang: Language::from_code(lang_code),
            overrides: None,
        }
    }

    /// 언어 코드 + 언어팩 디렉터리(locales/ 등)를 받아서 번역기를 생성한다.
    /// 디렉터리가 없거나 파일이 없으면 내장 문자열만 사용한다.
    pub fn new_with_pack(lang_code: &str, pack_dir: Option<&Path>) -> Self {
        let overrides = pack_dir
            .and_then(|dir| load_overrides(dir, lang_code))
            .or_else(|| load_overrides(Path::new("locales"), lang_code));
        if overrides.is_some() {
            log::debug!("loaded language pack overrides for {lang_code}");
        }
        Self {
            lang: Language::from_code(lang_code),
            overrides,
        }
    }

    pub fn language_code(&self) -> &'static str {
        self.lang.as_code()
    }

    /// 키를 조회해 문자열을 반환한다. 언어팩에 없으면 None.
    pub fn lookup(&self, key: &str) -> Option<String> {
        self.overrides.as_ref().and_then(|m| m.get(key).cloned())
    }

    /// 번역을 가져온다. 한국어 번역이 없으면 영어 문자열을 폴백하고, 그래도 없으면 키를 돌려준다.
    pub fn t(&self, key: &str) -> String {
        if let Some(v) = self.lookup(key) {
            return v;
        }
        let builtin = match self.lang {
            Language::Ko => ko(key).or_else(|| en(key)),
            Language::En => en(key),
        };
        builtin.map(str::to_string).unwrap_or_else(|| key.to_string())
    }

    /// `{name}` 자리표시자를 채운 번역을 돌려준다.
    pub fn tf(&self, key: &str, args: &[(&str, String)]) -> String {
        let mut text = self.t(key);
        for (name, value) in args {
            text = text.replace(&format!("{{{name}}}"), value);
        }
        text
    }
}

/// CLI 플래그/설정/시스템 순으로 언어 코드를 결정한다.
pub fn resolve_language(cli_arg: Option<&str>, config_lang: Option<&str>) -> String {
    cli_arg
        .and_then(normalize_lang)
        .or_else(|| config_lang.and_then(normalize_lang))
        .or_else(detect_system_language)
        .unwrap_or_else(|| "en".to_string())
}

/// 지원하는 언어 코드로 정규화한다. `auto`와 빈 값은 None.
pub fn normalize_lang(code: &str) -> Option<String> {
    let c = code.trim().to_lowercase();
    match c.as_str() {
        "auto" | "" => None,
        other if other.starts_with("ko") => Some("ko".into()),
        other if other.starts_with("en") => Some("en".into()),
        _ => None,
    }
}

fn normalize_locale_string(loc: &str) -> Option<String> {
    let lang = loc
        .split(['.', '_', '-'])
        .next()
        .unwrap_or_default()
        .to_lowercase();
    match lang.as_str() {
        "ko" => Some("ko".into()),
        "en" => Some("en".into()),
        _ => None,
    }
}

/// 시스템 로케일에서 언어를 추정한다.
pub fn detect_system_language() -> Option<String> {
    if let Some(loc) = get_locale() {
        if let Some(lang) = normalize_locale_string(&loc) {
            return Some(lang);
        }
    }
    for var in ["LC_ALL", "LANG"] {
        if let Ok(lang) = std::env::var(var) {
            if let Some(code) = normalize_locale_string(&lang) {
                return Some(code);
            }
        }
    }
    None
}

/// TOML 기반 언어팩을 로드한다. 중첩 테이블은 점으로 이은 키가 된다.
fn load_overrides(dir: &Path, lang: &str) -> Option<HashMap<String, String>> {
    let path = dir.join(format!("{lang}.toml"));
    let content = fs::read_to_string(&path).ok()?;
    let map = parse_toml_to_map(&content);
    if map.is_none() {
        log::warn!("ignoring empty or invalid language pack {}", path.display());
    }
    map
}

fn parse_toml_to_map(src: &str) -> Option<HashMap<String, String>> {
    let value: toml::Value = toml::from_str(src).ok()?;
    let table = value.as_table()?;
    let mut map = HashMap::new();

    fn walk(prefix: &str, val: &toml::Value, out: &mut HashMap<String, String>) {
        match val {
            toml::Value::String(s) => {
                out.insert(prefix.to_string(), s.to_string());
            }
            toml::Value::Table(t) => {
                for (k, v) in t {
                    let key = if prefix.is_empty() {
                        k.clone()
                    } else {
                        format!("{prefix}.{k}")
                    };
                    walk(&key, v, out);
                }
            }
            _ => {}
        }
    }

    for (k, v) in table {
        walk(k, v, &mut map);
    }

    if map.is_empty() {
        None
    } else {
        Some(map)
    }
}

/// 합계 단계 이름. 단계 키는 `TotalsStep::key()` 와 같다.
pub fn step_label(tr: &Translator, step_key: &str) -> String {
    let key = format!("step.{step_key}");
    let text = tr.t(&key);
    if text == key {
        step_key.replace('_', " ")
    } else {
        text
    }
}

fn en(key: &str) -> Option<&'static str> {
    use keys::*;
    Some(match key {
        NOT_PROVIDED => "Not provided",
        SAVED_TO => "Saved to",
        SECTION_INITIAL_DATA => "Initial data",
        SECTION_CALCULATIONS => "Calculations",
        SECTION_RESULTS => "Results",
        DATA_VERSION => "Reference data version",
        WARNINGS => "Warnings",

        TOTALS_HEADING => "== Installation volumes ==",
        TOTALS_MULTIPLIER => "Purge multiplier",
        TOTALS_MULTIPLIER_DEFAULT => "default",
        TOTALS_MULTIPLIER_OVERRIDE => "override",
        TOTALS_MULTIPLIER_SUBSTITUTED => "invalid value {supplied} replaced",
        TOTALS_SEGMENTS => "Pipe schedule",
        TOTALS_NO_SEGMENTS => "No pipe sections entered.",
        TOTALS_HOSE => "Purge hose",
        TOTALS_DIAPHRAGM => "Diaphragm meter",
        TOTALS_ROTARY => "Rotary meter",
        TOTALS_NO_METER => "No meter",
        TOTALS_INSTALL => "install",
        TOTALS_PURGE => "purge",
        TOTALS_WARNING_MULTIPLIER => "Purge multiplier {supplied} is not a positive number; {used} used instead.",

        "step.pipe_install" => "Pipe installation volume",
        "step.pipe_purge" => "Pipe purge volume",
        "step.purge_hose_purge" => "Purge hose volume",
        "step.diaphragm_install" => "Diaphragm meter installation allowance",
        "step.diaphragm_purge" => "Diaphragm meter purge allowance",
        "step.rotary_install" => "Rotary meter installation allowance",
        "step.rotary_purge" => "Rotary meter purge allowance",
        "step.system_components_volume" => "System components volume",
        "step.fittings_allowance" => "Fittings allowance",
        "step.estimated_system_volume" => "Estimated system volume",
        "step.purge_before_fittings" => "Purge volume before fittings",
        "step.purge_fittings_allowance" => "Purge fittings allowance",
        "step.total_purge_volume" => "Total purge volume",

        PLAN_HEADING => "== Test plan ==",
        PLAN_INSUFFICIENT_PRESSURE => "Please provide the design or operating pressure to generate recommendations.",
        PLAN_INSUFFICIENT_VOLUME => "Please provide the estimated system volume to generate recommendations.",
        PLAN_ROW_DESIGN => "Design pressure",
        PLAN_ROW_OPERATING => "Operating pressure",
        PLAN_ROW_VOLUME => "System volume",
        PLAN_ROW_FILL_RATE => "Expected fill rate",
        PLAN_ROW_START_TEMP => "Start temperature",
        PLAN_ROW_END_TEMP => "End temperature",
        PLAN_VOLUME_ENTERED => "entered",
        PLAN_VOLUME_ESTIMATED => "estimated from pipework",
        PLAN_DESIGN_FALLBACK => "Design pressure not entered; operating pressure ({value}) used.",
        PLAN_ALGORITHM_LOW => "Low-pressure algorithm applied because design pressure ({design}) is ≤ {threshold}.",
        PLAN_ALGORITHM_HIGH => "Medium/high-pressure algorithm applied because design pressure ({design}) exceeds {threshold}.",
        PLAN_STEP_CATEGORY => "Determine pressure category by comparing design pressure with {threshold}.",
        PLAN_STEP_STRENGTH => "Strength test pressure = max(1.5 × design pressure, {floor}).",
        PLAN_STEP_TIGHTNESS_LOW => "Tightness test pressure limited to 90% of strength recommendation and at least the design pressure or 20 mbar.",
        PLAN_STEP_TIGHTNESS_HIGH => "Tightness test pressure limited to 90% of strength recommendation and at least 10% above design pressure and ≥300 mbar.",
        PLAN_STEP_HOLD => "Hold time set from volume bands: ≤0.03 m³ → 5 min, 0.03–0.1 m³ → 10 min, 20 min plus 30 min per extra m³ beyond 0.1 m³ (5 to 180 min).",
        PLAN_STEP_STABILISATION => "Stabilisation time = ((volume ÷ fill rate) × 60) + 5 minutes, minimum 10 minutes.",
        PLAN_STEP_STABILISATION_MISSING => "Provide a fill rate to calculate the stabilisation time.",
        PLAN_STEP_TEMPERATURE => "Temperature compensation uses ΔP = P × ΔT ÷ (T₁ + 273.15).",
        PLAN_STEP_TEMPERATURE_MISSING => "Enter start and end temperatures to estimate apparent pressure change from temperature variation.",
        PLAN_RESULT_STRENGTH => "Strength test pressure",
        PLAN_RESULT_TIGHTNESS => "Tightness test pressure",
        PLAN_RESULT_HOLD => "Minimum hold time",
        PLAN_RESULT_STABILISATION => "Suggested stabilisation time",
        PLAN_RESULT_TEMPERATURE => "Temperature-induced apparent pressure change",
        PLAN_TEMP_STEADY => "No ambient temperature change detected during the test window.",
        PLAN_TEMP_RISE => "Temperature increase of {delta} would cause an apparent pressure rise of approximately {dp}.",
        PLAN_TEMP_FALL => "Temperature decrease of {delta} would cause an apparent pressure fall of approximately {dp}.",

        PURGE_HEADING => "== Purge and detection ==",
        PURGE_PIPE_SIZE => "Purge pipe size (Table 12)",
        PURGE_VOLUME => "Total purge volume",
        PURGE_DURATION => "Purge duration at F3 flow",
        PURGE_GAS_FAMILY => "Gas family",
        PURGE_UNKNOWN_GAS => "Gas family '{name}' is not in the F1/F3 reference.",
        PURGE_GAUGE => "Gauge",
        PURGE_UNKNOWN_GAUGE => "Gauge '{name}' is not in Table 6.",
        PURGE_TTD_HEADING => "Time to detect (TTD)",
        PURGE_TTD_BASE => "Base TTD = F1 × GRM × purge volume",
        PURGE_TTD_EXISTING_CD => "Existing CD area = base × 0.047",
        PURGE_TTD_TYPE_A => "Type A area = base × 2.8 ÷ room volume",
        PURGE_TTD_MISSING => "Select a gas family and a gauge to derive the TTD chain.",
        PURGE_GAS => "gas",
        PURGE_NITROGEN => "N₂",

        WIZARD_HEADING => "\n=== New IGEM/UP/1 procedure ===",
        WIZARD_HINT_BLANK => "Leave a field blank to skip it.",
        WIZARD_PIPE_SIZE => "Pipe size (e.g. DN50, 22mm copper; blank to finish): ",
        WIZARD_PIPE_LENGTH => "Length [m]: ",
        WIZARD_HOSE_SIZE => "Purge hose size (e.g. Purge hose 20mm): ",
        WIZARD_HOSE_LENGTH => "Purge hose length [m]: ",
        WIZARD_DIAPHRAGM => "Diaphragm meter (e.g. U6, blank for none): ",
        WIZARD_ROTARY => "Rotary meter (e.g. DN50, blank for none): ",
        WIZARD_MULTIPLIER => "Purge multiplier (blank for 1.5): ",
        WIZARD_DESIGN_PRESSURE => "Design pressure [mbar]: ",
        WIZARD_OPERATING_PRESSURE => "Operating pressure [mbar]: ",
        WIZARD_VOLUME => "Estimated system volume [m³] (blank to use the computed value): ",
        WIZARD_FILL_RATE => "Expected fill rate [m³/h]: ",
        WIZARD_START_TEMP => "Start temperature [°C]: ",
        WIZARD_END_TEMP => "End temperature [°C]: ",
        WIZARD_GAS_TYPE => "Gas family (e.g. Natural, Propane): ",
        WIZARD_GAUGE => "Gauge (Table 6): ",
        WIZARD_ROOM_VOLUME => "Room volume for Type A areas [m³]: ",
        WIZARD_PURGE_PIPE => "Largest pipe size for purge duration (Table 12): ",
        WIZARD_UNKNOWN_ID => "Not found in the reference tables. Try again.",

        ERROR_INVALID_NUMBER => "Please enter a number.",

        CONFIG_LANGUAGE => "Language",
        CONFIG_UNIT_SYSTEM => "Unit system",
        CONFIG_OUTPUT_FORMAT => "Output format",
        CONFIG_DEFAULT_UNITS => "Display units",
        CONFIG_SAVED => "Settings saved.",

        TABLES_REJECTED => "Rejected rows",
        _ => return None,
    })
}

fn ko(key: &str) -> Option<&'static str> {
    use keys::*;
    Some(match key {
        NOT_PROVIDED => "입력 없음",
        SAVED_TO => "저장 위치",
        SECTION_INITIAL_DATA => "초기 데이터",
        SECTION_CALCULATIONS => "계산 과정",
        SECTION_RESULTS => "결과",
        DATA_VERSION => "참조 데이터 버전",
        WARNINGS => "경고",

        TOTALS_HEADING => "== 설비 체적 ==",
        TOTALS_MULTIPLIER => "퍼지 배수",
        TOTALS_MULTIPLIER_DEFAULT => "기본값",
        TOTALS_MULTIPLIER_OVERRIDE => "사용자 지정",
        TOTALS_MULTIPLIER_SUBSTITUTED => "잘못된 값 {supplied} 대체됨",
        TOTALS_SEGMENTS => "배관 일정표",
        TOTALS_NO_SEGMENTS => "입력된 배관 구간이 없습니다.",
        TOTALS_HOSE => "퍼지 호스",
        TOTALS_DIAPHRAGM => "다이어프램 계량기",
        TOTALS_ROTARY => "로터리 계량기",
        TOTALS_NO_METER => "계량기 없음",
        TOTALS_INSTALL => "설치",
        TOTALS_PURGE => "퍼지",
        TOTALS_WARNING_MULTIPLIER => "퍼지 배수 {supplied} 는 양수가 아니므로 {used} 를 사용했습니다.",

        "step.pipe_install" => "배관 설치 체적",
        "step.pipe_purge" => "배관 퍼지 체적",
        "step.purge_hose_purge" => "퍼지 호스 체적",
        "step.diaphragm_install" => "다이어프램 계량기 설치 허용량",
        "step.diaphragm_purge" => "다이어프램 계량기 퍼지 허용량",
        "step.rotary_install" => "로터리 계량기 설치 허용량",
        "step.rotary_purge" => "로터리 계량기 퍼지 허용량",
        "step.system_components_volume" => "시스템 구성품 체적",
        "step.fittings_allowance" => "피팅 허용량",
        "step.estimated_system_volume" => "추정 시스템 체적",
        "step.purge_before_fittings" => "피팅 보정 전 퍼지 체적",
        "step.purge_fittings_allowance" => "퍼지 피팅 허용량",
        "step.total_purge_volume" => "총 퍼지 체적",

        PLAN_HEADING => "== 시험 계획 ==",
        PLAN_INSUFFICIENT_PRESSURE => "권장값을 만들려면 설계 압력 또는 운전 압력을 입력하세요.",
        PLAN_INSUFFICIENT_VOLUME => "권장값을 만들려면 추정 시스템 체적을 입력하세요.",
        PLAN_ROW_DESIGN => "설계 압력",
        PLAN_ROW_OPERATING => "운전 압력",
        PLAN_ROW_VOLUME => "시스템 체적",
        PLAN_ROW_FILL_RATE => "예상 충전 유량",
        PLAN_ROW_START_TEMP => "시작 온도",
        PLAN_ROW_END_TEMP => "종료 온도",
        PLAN_VOLUME_ENTERED => "직접 입력",
        PLAN_VOLUME_ESTIMATED => "배관 계산값",
        PLAN_DESIGN_FALLBACK => "설계 압력이 없어 운전 압력({value})을 사용했습니다.",
        PLAN_ALGORITHM_LOW => "설계 압력({design})이 {threshold} 이하이므로 저압 알고리즘을 적용했습니다.",
        PLAN_ALGORITHM_HIGH => "설계 압력({design})이 {threshold} 를 넘으므로 중/고압 알고리즘을 적용했습니다.",
        PLAN_STEP_CATEGORY => "설계 압력을 {threshold} 와 비교해 압력 구분을 정합니다.",
        PLAN_STEP_STRENGTH => "강도시험 압력 = max(1.5 × 설계 압력, {floor}).",
        PLAN_STEP_TIGHTNESS_LOW => "기밀시험 압력은 강도시험 압력의 90% 이하, 설계 압력 또는 20 mbar 이상.",
        PLAN_STEP_TIGHTNESS_HIGH => "기밀시험 압력은 강도시험 압력의 90% 이하, 설계 압력의 110% 및 300 mbar 이상.",
        PLAN_STEP_HOLD => "유지 시간 구간: ≤0.03 m³ → 5분, 0.03–0.1 m³ → 10분, 0.1 m³ 초과분 1 m³ 당 30분 추가(기본 20분, 5~180분).",
        PLAN_STEP_STABILISATION => "안정화 시간 = ((체적 ÷ 충전 유량) × 60) + 5분, 최소 10분.",
        PLAN_STEP_STABILISATION_MISSING => "안정화 시간을 계산하려면 충전 유량을 입력하세요.",
        PLAN_STEP_TEMPERATURE => "온도 보정: ΔP = P × ΔT ÷ (T₁ + 273.15).",
        PLAN_STEP_TEMPERATURE_MISSING => "온도 변화에 의한 겉보기 압력 변화를 보려면 시작/종료 온도를 입력하세요.",
        PLAN_RESULT_STRENGTH => "강도시험 압력",
        PLAN_RESULT_TIGHTNESS => "기밀시험 압력",
        PLAN_RESULT_HOLD => "최소 유지 시간",
        PLAN_RESULT_STABILISATION => "권장 안정화 시간",
        PLAN_RESULT_TEMPERATURE => "온도에 의한 겉보기 압력 변화",
        PLAN_TEMP_STEADY => "시험 중 주변 온도 변화가 없습니다.",
        PLAN_TEMP_RISE => "온도가 {delta} 오르면 압력이 약 {dp} 오른 것처럼 보입니다.",
        PLAN_TEMP_FALL => "온도가 {delta} 내리면 압력이 약 {dp} 떨어진 것처럼 보입니다.",

        PURGE_HEADING => "== 퍼지 및 감지 ==",
        PURGE_PIPE_SIZE => "퍼지 배관 크기 (Table 12)",
        PURGE_VOLUME => "총 퍼지 체적",
        PURGE_DURATION => "F3 유량 기준 퍼지 시간",
        PURGE_GAS_FAMILY => "가스 종류",
        PURGE_UNKNOWN_GAS => "가스 종류 '{name}' 는 F1/F3 참조표에 없습니다.",
        PURGE_GAUGE => "압력계",
        PURGE_UNKNOWN_GAUGE => "압력계 '{name}' 는 Table 6 에 없습니다.",
        PURGE_TTD_HEADING => "감지 시간 (TTD)",
        PURGE_TTD_BASE => "기본 TTD = F1 × GRM × 퍼지 체적",
        PURGE_TTD_EXISTING_CD => "기존 CD 구역 = 기본값 × 0.047",
        PURGE_TTD_TYPE_A => "Type A 구역 = 기본값 × 2.8 ÷ 실 체적",
        PURGE_TTD_MISSING => "TTD 를 계산하려면 가스 종류와 압력계를 선택하세요.",
        PURGE_GAS => "가스",
        PURGE_NITROGEN => "질소",

        WIZARD_HEADING => "\n=== 새 IGEM/UP/1 절차서 ===",
        WIZARD_HINT_BLANK => "건너뛰려면 빈 값으로 두세요.",
        WIZARD_PIPE_SIZE => "배관 크기 (예: DN50, 22mm copper, 빈 값이면 종료): ",
        WIZARD_PIPE_LENGTH => "길이 [m]: ",
        WIZARD_HOSE_SIZE => "퍼지 호스 크기 (예: Purge hose 20mm): ",
        WIZARD_HOSE_LENGTH => "퍼지 호스 길이 [m]: ",
        WIZARD_DIAPHRAGM => "다이어프램 계량기 (예: U6, 없으면 빈 값): ",
        WIZARD_ROTARY => "로터리 계량기 (예: DN50, 없으면 빈 값): ",
        WIZARD_MULTIPLIER => "퍼지 배수 (빈 값이면 1.5): ",
        WIZARD_DESIGN_PRESSURE => "설계 압력 [mbar]: ",
        WIZARD_OPERATING_PRESSURE => "운전 압력 [mbar]: ",
        WIZARD_VOLUME => "추정 시스템 체적 [m³] (빈 값이면 계산값 사용): ",
        WIZARD_FILL_RATE => "예상 충전 유량 [m³/h]: ",
        WIZARD_START_TEMP => "시작 온도 [°C]: ",
        WIZARD_END_TEMP => "종료 온도 [°C]: ",
        WIZARD_GAS_TYPE => "가스 종류 (예: Natural, Propane): ",
        WIZARD_GAUGE => "압력계 (Table 6): ",
        WIZARD_ROOM_VOLUME => "Type A 구역 실 체적 [m³]: ",
        WIZARD_PURGE_PIPE => "퍼지 시간 계산용 최대 배관 크기 (Table 12): ",
        WIZARD_UNKNOWN_ID => "참조표에 없는 값입니다. 다시 입력하세요.",

        ERROR_INVALID_NUMBER => "숫자를 입력하세요.",

        CONFIG_LANGUAGE => "언어",
        CONFIG_UNIT_SYSTEM => "단위계",
        CONFIG_OUTPUT_FORMAT => "출력 형식",
        CONFIG_DEFAULT_UNITS => "표시 단위",
        CONFIG_SAVED => "설정을 저장했습니다.",

        TABLES_REJECTED => "거부된 행",
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholders_are_filled() {
        let tr = Translator::new("en");
        let text = tr.tf(
            keys::TOTALS_WARNING_MULTIPLIER,
            &[("supplied", "-1".into()), ("used", "1.5".into())],
        );
        assert_eq!(
            text,
            "Purge multiplier -1 is not a positive number; 1.5 used instead."
        );
    }

    #[test]
    fn unknown_key_falls_back_to_key() {
        let tr = Translator::new("ko");
        assert_eq!(tr.t("no.such.key"), "no.such.key");
        assert_eq!(step_label(&tr, "made_up_step"), "made up step");
    }

    #[test]
    fn language_codes_normalise() {
        assert_eq!(normalize_lang("ko-KR").as_deref(), Some("ko"));
        assert_eq!(normalize_lang("en_GB").as_deref(), Some("en"));
        assert_eq!(normalize_lang("auto"), None);
        assert_eq!(resolve_language(Some("ko"), Some("en")), "ko");
        assert_eq!(resolve_language(Some("auto"), Some("en")), "en");
    }

    #[test]
    fn pack_directory_overrides_builtin_text() {
        let dir = match tempfile::tempdir() {
            Ok(d) => d,
            Err(e) => panic!("{e}"),
        };
        let written = fs::write(
            dir.path().join("en.toml"),
            "[totals]\nheading = \"Volumes\"\n",
        );
        assert!(written.is_ok());

        let tr = Translator::new_with_pack("en", Some(dir.path()));
        assert_eq!(tr.t(keys::TOTALS_HEADING), "Volumes");
        // 팩에 없는 키는 내장 문자열로 돌아간다
        assert_eq!(
            tr.t(keys::TOTALS_DIAPHRAGM),
            Translator::new("en").t(keys::TOTALS_DIAPHRAGM)
        );
    }
}
