//! Per-bank parsers.
//!
//! Each module owns an immutable configuration built at construction
//! and composes the shared utilities (`dates`, `amounts`, `line`,
//! `table`). Banks whose statements have shapes the generic families
//! cannot express add a custom per-line hook.

mod anz;
mod au;
mod bank_of_america;
mod becu;
mod commerce;
mod commonwealth;
mod monese;
mod paypal;
mod rbc;
mod uk;
mod us;
mod wells_fargo;
mod westpac;
mod woodforest;

pub use anz::AnzParser;
pub use au::BendigoParser;
pub use bank_of_america::BankOfAmericaParser;
pub use becu::BecuParser;
pub use commerce::CommerceParser;
pub use commonwealth::CommonwealthParser;
pub use monese::MoneseParser;
pub use paypal::PaypalParser;
pub use rbc::{RbcParser, ScotiabankParser};
pub use uk::{LloydsParser, MetroParser, NationwideParser, RabobankParser};
pub use us::{
    CitizensParser, DcuParser, DiscoverParser, GreenDotParser, NavyFederalParser, NetspendParser,
    PncParser, SuntrustParser, UsaaParser, WalmartParser,
};
pub use wells_fargo::WellsFargoParser;
pub use westpac::{WESTPAC_DATE_NOTE, WestpacParser};
pub use woodforest::WoodforestParser;

use super::BankParser;
use crate::banks::BankTag;

/// Look up the parser registered for a tag.
///
/// `Chase` and `Unknown` intentionally return `None`: Chase statements
/// parse well through the generic cascade, and unknown documents have
/// nowhere else to go.
pub fn parser_for(tag: BankTag) -> Option<Box<dyn BankParser>> {
    match tag {
        BankTag::Anz => Some(Box::new(AnzParser::new())),
        BankTag::BankOfAmerica => Some(Box::new(BankOfAmericaParser::new())),
        BankTag::Becu => Some(Box::new(BecuParser::new())),
        BankTag::Bendigo => Some(Box::new(BendigoParser::new())),
        BankTag::Citizens => Some(Box::new(CitizensParser::new())),
        BankTag::Commerce => Some(Box::new(CommerceParser::new())),
        BankTag::Commonwealth => Some(Box::new(CommonwealthParser::new())),
        BankTag::Dcu => Some(Box::new(DcuParser::new())),
        BankTag::Discover => Some(Box::new(DiscoverParser::new())),
        BankTag::GreenDot => Some(Box::new(GreenDotParser::new())),
        BankTag::Lloyds => Some(Box::new(LloydsParser::new())),
        BankTag::Metro => Some(Box::new(MetroParser::new())),
        BankTag::Monese => Some(Box::new(MoneseParser::new())),
        BankTag::Nationwide => Some(Box::new(NationwideParser::new())),
        BankTag::NavyFederal => Some(Box::new(NavyFederalParser::new())),
        BankTag::Netspend => Some(Box::new(NetspendParser::new())),
        BankTag::Paypal => Some(Box::new(PaypalParser::new())),
        BankTag::Pnc => Some(Box::new(PncParser::new())),
        BankTag::Rabobank => Some(Box::new(RabobankParser::new())),
        BankTag::Rbc => Some(Box::new(RbcParser::new())),
        BankTag::Scotiabank => Some(Box::new(ScotiabankParser::new())),
        BankTag::Suntrust => Some(Box::new(SuntrustParser::new())),
        BankTag::Usaa => Some(Box::new(UsaaParser::new())),
        BankTag::Walmart => Some(Box::new(WalmartParser::new())),
        BankTag::WellsFargo => Some(Box::new(WellsFargoParser::new())),
        BankTag::Westpac => Some(Box::new(WestpacParser::new())),
        BankTag::Woodforest => Some(Box::new(WoodforestParser::new())),
        BankTag::Chase | BankTag::Unknown => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_known_tag_has_a_parser() {
        let tags = [
            BankTag::Anz,
            BankTag::BankOfAmerica,
            BankTag::Becu,
            BankTag::Bendigo,
            BankTag::Citizens,
            BankTag::Commerce,
            BankTag::Commonwealth,
            BankTag::Dcu,
            BankTag::Discover,
            BankTag::GreenDot,
            BankTag::Lloyds,
            BankTag::Metro,
            BankTag::Monese,
            BankTag::Nationwide,
            BankTag::NavyFederal,
            BankTag::Netspend,
            BankTag::Paypal,
            BankTag::Pnc,
            BankTag::Rabobank,
            BankTag::Rbc,
            BankTag::Scotiabank,
            BankTag::Suntrust,
            BankTag::Usaa,
            BankTag::Walmart,
            BankTag::WellsFargo,
            BankTag::Westpac,
            BankTag::Woodforest,
        ];
        for tag in tags {
            let parser = parser_for(tag).expect("registered parser");
            assert_eq!(parser.tag(), tag);
        }
    }

    #[test]
    fn test_chase_and_unknown_use_fallback() {
        assert!(parser_for(BankTag::Chase).is_none());
        assert!(parser_for(BankTag::Unknown).is_none());
    }
}
