use std::io::{self, Write};

use crate::app::AppError;
use crate::form::{FormSnapshot, PipeRow};
use crate::gas::reference_data::{MeterKind, ReferenceTables};
use crate::i18n::{keys, Translator};

/// 새 절차서를 대화형으로 입력받는다. 참조표에 없는 ID는 다시 묻는다.
pub fn new_form_wizard(tr: &Translator, tables: &ReferenceTables) -> Result<FormSnapshot, AppError> {
    println!("{}", tr.t(keys::WIZARD_HEADING));
    println!("{}", tr.t(keys::WIZARD_HINT_BLANK));

    let mut form = FormSnapshot::default();
    loop {
        let size = read_id(tr, keys::WIZARD_PIPE_SIZE, |id| tables.segment(id).is_some())?;
        if size.is_empty() {
            break;
        }
        let length = read_optional_f64(tr, keys::WIZARD_PIPE_LENGTH)?;
        form.pipes.push(PipeRow::new(size, length));
    }

    form.purge_hose_size = read_id(tr, keys::WIZARD_HOSE_SIZE, |id| tables.segment(id).is_some())?;
    if !form.purge_hose_size.is_empty() {
        form.purge_hose_length = read_optional_f64(tr, keys::WIZARD_HOSE_LENGTH)?;
    }
    form.diaphragm_meter = read_id(tr, keys::WIZARD_DIAPHRAGM, |id| {
        is_no_meter(id) || tables.meter(MeterKind::Diaphragm, id).is_some()
    })?;
    form.rotary_meter = read_id(tr, keys::WIZARD_ROTARY, |id| {
        is_no_meter(id) || tables.meter(MeterKind::Rotary, id).is_some()
    })?;
    form.purge_multiplier = read_optional_f64(tr, keys::WIZARD_MULTIPLIER)?;

    form.design_pressure = read_optional_f64(tr, keys::WIZARD_DESIGN_PRESSURE)?;
    form.operating_pressure = read_optional_f64(tr, keys::WIZARD_OPERATING_PRESSURE)?;
    form.volume = read_optional_f64(tr, keys::WIZARD_VOLUME)?;
    form.test_fill_rate = read_optional_f64(tr, keys::WIZARD_FILL_RATE)?;
    form.test_temp_start = read_optional_f64(tr, keys::WIZARD_START_TEMP)?;
    form.test_temp_end = read_optional_f64(tr, keys::WIZARD_END_TEMP)?;

    form.gas_type = read_id(tr, keys::WIZARD_GAS_TYPE, |id| tables.gas_factor(id).is_some())?;
    form.gauge = read_id(tr, keys::WIZARD_GAUGE, |id| tables.gauge(id).is_some())?;
    form.room_volume = read_optional_f64(tr, keys::WIZARD_ROOM_VOLUME)?;
    form.purge_pipe_size = read_id(tr, keys::WIZARD_PURGE_PIPE, |id| {
        tables.purge_factor(id).is_some()
    })?;
    Ok(form)
}

fn is_no_meter(id: &str) -> bool {
    let id = id.trim();
    id.eq_ignore_ascii_case("none") || id.eq_ignore_ascii_case("no meter")
}

/// 빈 값 또는 `known` 을 만족하는 ID가 나올 때까지 묻는다.
fn read_id(
    tr: &Translator,
    prompt_key: &str,
    known: impl Fn(&str) -> bool,
) -> Result<String, AppError> {
    loop {
        let s = read_line(&tr.t(prompt_key))?;
        let id = s.trim();
        if id.is_empty() || known(id) {
            return Ok(id.to_string());
        }
        println!("{}", tr.t(keys::WIZARD_UNKNOWN_ID));
    }
}

/// 빈 값 또는 숫자를 받는다. 폼에는 입력한 텍스트 그대로 남긴다.
fn read_optional_f64(tr: &Translator, prompt_key: &str) -> Result<String, AppError> {
    loop {
        let s = read_line(&tr.t(prompt_key))?;
        let t = s.trim();
        if t.is_empty() || t.parse::<f64>().map(f64::is_finite).unwrap_or(false) {
            return Ok(t.to_string());
        }
        println!("{}", tr.t(keys::ERROR_INVALID_NUMBER));
    }
}

fn read_line(prompt: &str) -> Result<String, AppError> {
    print!("{prompt}");
    io::stdout().flush().map_err(AppError::Io)?;
    let mut buf = String::new();
    let read = io::stdin().read_line(&mut buf).map_err(AppError::Io)?;
    if read == 0 {
        return Err(AppError::Io(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "input closed",
        )));
    }
    Ok(buf)
}
