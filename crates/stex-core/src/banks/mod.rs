//! Bank identification: the closed institution tag set and the classifier.

mod classify;

pub use classify::classify;

use serde::{Deserialize, Serialize};

use crate::models::{Currency, DateOrder};

/// Identity of the originating institution.
///
/// Closed set known to the classifier; anything it cannot place is
/// `Unknown` and handled by the generic fallback cascade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BankTag {
    Anz,
    BankOfAmerica,
    Becu,
    Bendigo,
    Chase,
    Citizens,
    Commerce,
    Commonwealth,
    Dcu,
    Discover,
    GreenDot,
    Lloyds,
    Metro,
    Monese,
    Nationwide,
    NavyFederal,
    Netspend,
    Paypal,
    Pnc,
    Rabobank,
    Rbc,
    Scotiabank,
    Suntrust,
    Usaa,
    Walmart,
    WellsFargo,
    Westpac,
    Woodforest,
    Unknown,
}

/// Regional family of a bank, driving date-order and currency defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BankFamily {
    Us,
    Uk,
    Australia,
    Canada,
    Netherlands,
    Unknown,
}

impl BankTag {
    /// Symbolic name, matching the serialized form.
    pub fn as_str(&self) -> &'static str {
        match self {
            BankTag::Anz => "anz",
            BankTag::BankOfAmerica => "bank_of_america",
            BankTag::Becu => "becu",
            BankTag::Bendigo => "bendigo",
            BankTag::Chase => "chase",
            BankTag::Citizens => "citizens",
            BankTag::Commerce => "commerce",
            BankTag::Commonwealth => "commonwealth",
            BankTag::Dcu => "dcu",
            BankTag::Discover => "discover",
            BankTag::GreenDot => "green_dot",
            BankTag::Lloyds => "lloyds",
            BankTag::Metro => "metro",
            BankTag::Monese => "monese",
            BankTag::Nationwide => "nationwide",
            BankTag::NavyFederal => "navy_federal",
            BankTag::Netspend => "netspend",
            BankTag::Paypal => "paypal",
            BankTag::Pnc => "pnc",
            BankTag::Rabobank => "rabobank",
            BankTag::Rbc => "rbc",
            BankTag::Scotiabank => "scotiabank",
            BankTag::Suntrust => "suntrust",
            BankTag::Usaa => "usaa",
            BankTag::Walmart => "walmart",
            BankTag::WellsFargo => "wells_fargo",
            BankTag::Westpac => "westpac",
            BankTag::Woodforest => "woodforest",
            BankTag::Unknown => "unknown",
        }
    }

    /// Regional family: decides default currency and date order.
    pub fn family(&self) -> BankFamily {
        match self {
            BankTag::Anz | BankTag::Bendigo | BankTag::Commonwealth | BankTag::Westpac => {
                BankFamily::Australia
            }
            BankTag::Lloyds | BankTag::Metro | BankTag::Monese | BankTag::Nationwide => {
                BankFamily::Uk
            }
            BankTag::Rbc | BankTag::Scotiabank => BankFamily::Canada,
            BankTag::Rabobank => BankFamily::Netherlands,
            BankTag::Unknown => BankFamily::Unknown,
            _ => BankFamily::Us,
        }
    }
}

impl std::fmt::Display for BankTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl BankFamily {
    /// Default date order for ambiguous numeric dates in this region.
    pub fn date_order(&self) -> Option<DateOrder> {
        match self {
            BankFamily::Us => Some(DateOrder::Mdy),
            BankFamily::Uk | BankFamily::Australia | BankFamily::Netherlands => {
                Some(DateOrder::Dmy)
            }
            // Canadian statements in the wild mix both; RBC/Scotiabank
            // rows use `D Mon` forms that are unambiguous anyway.
            BankFamily::Canada => Some(DateOrder::Dmy),
            BankFamily::Unknown => None,
        }
    }

    /// Default currency when no symbol is found in the header.
    pub fn currency(&self) -> Currency {
        match self {
            BankFamily::Us => Currency::Usd,
            BankFamily::Uk => Currency::Gbp,
            BankFamily::Australia => Currency::Aud,
            BankFamily::Canada => Currency::Cad,
            BankFamily::Netherlands => Currency::Eur,
            BankFamily::Unknown => Currency::Usd,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_roundtrip_serde() {
        let json = serde_json::to_string(&BankTag::WellsFargo).unwrap();
        assert_eq!(json, "\"wells_fargo\"");
        let back: BankTag = serde_json::from_str(&json).unwrap();
        assert_eq!(back, BankTag::WellsFargo);
    }

    #[test]
    fn test_families() {
        assert_eq!(BankTag::Anz.family(), BankFamily::Australia);
        assert_eq!(BankTag::Lloyds.family(), BankFamily::Uk);
        assert_eq!(BankTag::Rabobank.family(), BankFamily::Netherlands);
        assert_eq!(BankTag::Pnc.family(), BankFamily::Us);
        assert_eq!(BankTag::Unknown.family(), BankFamily::Unknown);
    }

    #[test]
    fn test_family_defaults() {
        assert_eq!(BankFamily::Australia.currency(), Currency::Aud);
        assert_eq!(BankFamily::Us.date_order(), Some(DateOrder::Mdy));
        assert_eq!(BankFamily::Uk.date_order(), Some(DateOrder::Dmy));
    }
}
