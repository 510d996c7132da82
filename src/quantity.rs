/// 입력 필드가 다루는 물리량 종류.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantityKind {
    Pressure,
    Volume,
    Length,
    Temperature,
    /// 온도차 (기준점 없음)
    TemperatureDifference,
}

impl QuantityKind {
    pub const ALL: [QuantityKind; 5] = [
        QuantityKind::Pressure,
        QuantityKind::Volume,
        QuantityKind::Length,
        QuantityKind::Temperature,
        QuantityKind::TemperatureDifference,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            QuantityKind::Pressure => "pressure",
            QuantityKind::Volume => "volume",
            QuantityKind::Length => "length",
            QuantityKind::Temperature => "temperature",
            QuantityKind::TemperatureDifference => "temperature-diff",
        }
    }

    pub fn from_key(key: &str) -> Option<QuantityKind> {
        let key = key.trim();
        Self::ALL.into_iter().find(|k| k.key().eq_ignore_ascii_case(key))
    }

    /// 계산 엔진이 쓰는 기준 단위 기호.
    pub fn canonical_symbol(&self) -> &'static str {
        match self {
            QuantityKind::Pressure => "mbar",
            QuantityKind::Volume => "m³",
            QuantityKind::Length => "m",
            QuantityKind::Temperature | QuantityKind::TemperatureDifference => "°C",
        }
    }
}
