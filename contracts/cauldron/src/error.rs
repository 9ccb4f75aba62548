use soroban_sdk::contracterror;

/// Errors returned by every contract entry point
#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum ProtocolError {
    AlreadyInitialized = 1,
    NotInitialized = 2,
    NotAdmin = 3,

    UnknownAsset = 10,
    UnknownSeries = 11,
    VaultNotFound = 12,
    IlkNotApproved = 13,

    DuplicateAsset = 20,
    DuplicateSeries = 21,

    NotOwner = 30,

    Undercollateralized = 40,
    TooMuchDebt = 41,

    NotEmpty = 50,
    HasDebt = 51,
    HasCollateral = 52,
    AlreadyTimestamped = 53,
    NotTimestamped = 54,
    NothingToBuy = 55,
    NotUndercollateralized = 56,
    UnderLiquidation = 57,
    SeriesMatured = 58,
    SeriesNotMature = 59,
    AlreadyMatured = 60,
    ApprovalInUse = 61,
    InsufficientCollateral = 62,

    InvalidAmount = 70,
    InvalidRatio = 71,
    InvalidMaturity = 72,
    InvalidDuration = 73,
    InvalidRate = 74,
    InvalidSpot = 75,

    SlippageExceeded = 80,

    ArithmeticOverflow = 90,
}

/// Coarse classification of [`ProtocolError`] for callers that only care
/// about the failure family.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    NotFound,
    Duplicate,
    Unauthorized,
    InvariantViolation,
    InvalidState,
    InvalidInput,
    SlippageExceeded,
    Arithmetic,
}

impl ProtocolError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ProtocolError::UnknownAsset
            | ProtocolError::UnknownSeries
            | ProtocolError::VaultNotFound
            | ProtocolError::IlkNotApproved => ErrorKind::NotFound,
            ProtocolError::DuplicateAsset | ProtocolError::DuplicateSeries => ErrorKind::Duplicate,
            ProtocolError::NotAdmin | ProtocolError::NotOwner => ErrorKind::Unauthorized,
            ProtocolError::Undercollateralized | ProtocolError::TooMuchDebt => {
                ErrorKind::InvariantViolation
            }
            ProtocolError::AlreadyInitialized
            | ProtocolError::NotInitialized
            | ProtocolError::NotEmpty
            | ProtocolError::HasDebt
            | ProtocolError::HasCollateral
            | ProtocolError::AlreadyTimestamped
            | ProtocolError::NotTimestamped
            | ProtocolError::NothingToBuy
            | ProtocolError::NotUndercollateralized
            | ProtocolError::UnderLiquidation
            | ProtocolError::SeriesMatured
            | ProtocolError::SeriesNotMature
            | ProtocolError::AlreadyMatured
            | ProtocolError::ApprovalInUse
            | ProtocolError::InsufficientCollateral => ErrorKind::InvalidState,
            ProtocolError::InvalidAmount
            | ProtocolError::InvalidRatio
            | ProtocolError::InvalidMaturity
            | ProtocolError::InvalidDuration
            | ProtocolError::InvalidRate
            | ProtocolError::InvalidSpot => ErrorKind::InvalidInput,
            ProtocolError::SlippageExceeded => ErrorKind::SlippageExceeded,
            ProtocolError::ArithmeticOverflow => ErrorKind::Arithmetic,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        assert_eq!(ProtocolError::VaultNotFound.kind(), ErrorKind::NotFound);
        assert_eq!(ProtocolError::DuplicateSeries.kind(), ErrorKind::Duplicate);
        assert_eq!(ProtocolError::NotOwner.kind(), ErrorKind::Unauthorized);
        assert_eq!(ProtocolError::TooMuchDebt.kind(), ErrorKind::InvariantViolation);
        assert_eq!(ProtocolError::AlreadyTimestamped.kind(), ErrorKind::InvalidState);
        assert_eq!(ProtocolError::SlippageExceeded.kind(), ErrorKind::SlippageExceeded);
    }
}
