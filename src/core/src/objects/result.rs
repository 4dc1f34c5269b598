//! Transaction result codes as recorded in metadata.

use std::fmt;

/// A `TransactionResult` byte.
///
/// Only `tes` and `tec` results are ever written to a ledger, so those are
/// the codes with names; any other byte is kept as is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TransactionResult(pub u8);

static RESULTS: &[(u8, &str)] = &[
    (0, "tesSUCCESS"),
    (100, "tecCLAIM"),
    (101, "tecPATH_PARTIAL"),
    (102, "tecUNFUNDED_ADD"),
    (103, "tecUNFUNDED_OFFER"),
    (104, "tecUNFUNDED_PAYMENT"),
    (105, "tecFAILED_PROCESSING"),
    (121, "tecDIR_FULL"),
    (122, "tecINSUF_RESERVE_LINE"),
    (123, "tecINSUF_RESERVE_OFFER"),
    (124, "tecNO_DST"),
    (125, "tecNO_DST_INSUF_XRP"),
    (126, "tecNO_LINE_INSUF_RESERVE"),
    (127, "tecNO_LINE_REDUNDANT"),
    (128, "tecPATH_DRY"),
    (129, "tecUNFUNDED"),
    (130, "tecNO_ALTERNATIVE_KEY"),
    (131, "tecNO_REGULAR_KEY"),
    (132, "tecOWNERS"),
    (133, "tecNO_ISSUER"),
    (134, "tecNO_AUTH"),
    (135, "tecNO_LINE"),
    (136, "tecINSUFF_FEE"),
    (137, "tecFROZEN"),
    (138, "tecNO_TARGET"),
    (139, "tecNO_PERMISSION"),
    (140, "tecNO_ENTRY"),
    (141, "tecINSUFFICIENT_RESERVE"),
    (142, "tecNEED_MASTER_KEY"),
    (143, "tecDST_TAG_NEEDED"),
    (144, "tecINTERNAL"),
    (145, "tecOVERSIZE"),
    (146, "tecCRYPTOCONDITION_ERROR"),
    (147, "tecINVARIANT_FAILED"),
    (148, "tecEXPIRED"),
    (149, "tecDUPLICATE"),
    (150, "tecKILLED"),
    (151, "tecHAS_OBLIGATIONS"),
    (152, "tecTOO_SOON"),
    (154, "tecMAX_SEQUENCE_REACHED"),
    (159, "tecINSUFFICIENT_FUNDS"),
    (160, "tecOBJECT_NOT_FOUND"),
    (161, "tecINSUFFICIENT_PAYMENT"),
    (162, "tecUNFUNDED_AMM"),
    (163, "tecAMM_BALANCE"),
    (164, "tecAMM_FAILED"),
    (165, "tecAMM_INVALID_TOKENS"),
    (166, "tecAMM_EMPTY"),
    (167, "tecAMM_NOT_EMPTY"),
    (168, "tecAMM_ACCOUNT"),
    (169, "tecINCOMPLETE"),
];

impl TransactionResult {
    /// `tesSUCCESS`
    pub const SUCCESS: TransactionResult = TransactionResult(0);

    /// The result token, e.g. `tecPATH_DRY`.
    pub fn token(&self) -> Option<&'static str> {
        RESULTS
            .iter()
            .find(|(code, _)| *code == self.0)
            .map(|(_, token)| *token)
    }

    /// Resolves a result token.
    pub fn from_token(token: &str) -> Option<Self> {
        RESULTS
            .iter()
            .find(|(_, t)| *t == token)
            .map(|(code, _)| TransactionResult(*code))
    }

    /// True for `tesSUCCESS`.
    pub fn is_success(&self) -> bool {
        self.0 == 0
    }

    /// True for a claimed-fee failure.
    pub fn is_claimed(&self) -> bool {
        self.0 >= 100
    }
}

impl fmt::Display for TransactionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.token() {
            Some(token) => f.write_str(token),
            None => write!(f, "{}", self.0),
        }
    }
}
