/// IFA 方案 `06` 下支援的資料識別碼 (ANSI MH10.8.2)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataIdentifier {
    /// `9N` PPN (內含 PZN)
    ProductNumber,
    /// `1T` 批號
    Batch,
    /// `16D` 製造日期 YYYYMMDD
    ProductionDate,
    /// `D` 有效日期 YYMMDD
    ExpirationDate,
    /// `S` 序號
    Serial,
    /// `8P` GTIN/NTIN
    Gtin,
}

impl DataIdentifier {
    /// 比對順序固定：`16D` 必須排在 `D` 之前
    pub const PRIORITY: [DataIdentifier; 6] = [
        DataIdentifier::ProductNumber,
        DataIdentifier::Batch,
        DataIdentifier::ProductionDate,
        DataIdentifier::ExpirationDate,
        DataIdentifier::Serial,
        DataIdentifier::Gtin,
    ];

    pub fn prefix(&self) -> &'static str {
        match self {
            DataIdentifier::ProductNumber => "9N",
            DataIdentifier::Batch => "1T",
            DataIdentifier::ProductionDate => "16D",
            DataIdentifier::ExpirationDate => "D",
            DataIdentifier::Serial => "S",
            DataIdentifier::Gtin => "8P",
        }
    }

    /// 找出區段的識別碼，未知的識別碼回傳 `None`
    pub fn identify(segment: &str) -> Option<DataIdentifier> {
        Self::PRIORITY
            .into_iter()
            .find(|id| segment.starts_with(id.prefix()))
    }

    /// 切出識別碼與其後的內容
    pub fn split(segment: &str) -> Option<(DataIdentifier, &str)> {
        let id = Self::identify(segment)?;
        Some((id, &segment[id.prefix().len()..]))
    }
}
