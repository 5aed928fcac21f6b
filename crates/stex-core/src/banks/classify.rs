//! Bank classifier: filename hints first, then content fingerprints.

use tracing::debug;

use super::BankTag;
use crate::pdf::StatementDocument;

/// How many leading pages contribute to content matching.
const CLASSIFY_PAGES: usize = 3;

/// Filename fragments per bank. Matched against the lowercased file
/// stem; first bank with any matching fragment wins.
const FILENAME_PATTERNS: &[(BankTag, &[&str])] = &[
    (BankTag::WellsFargo, &["wells_fargo", "wellsfargo", "wells"]),
    (BankTag::BankOfAmerica, &["bank_of_america", "bankofamerica", "bofa", "boa_"]),
    (BankTag::NavyFederal, &["navy_federal", "navyfederal", "nfcu"]),
    (BankTag::Walmart, &["walmart", "moneycard"]),
    (BankTag::GreenDot, &["green_dot", "greendot"]),
    (BankTag::Netspend, &["netspend"]),
    (BankTag::Woodforest, &["woodforest"]),
    (BankTag::Commonwealth, &["commonwealth", "commbank"]),
    (BankTag::Commerce, &["commerce"]),
    (BankTag::Nationwide, &["nationwide"]),
    (BankTag::Scotiabank, &["scotiabank", "scotia"]),
    (BankTag::Rabobank, &["rabobank", "rabo_"]),
    (BankTag::Suntrust, &["suntrust"]),
    (BankTag::Citizens, &["citizens"]),
    (BankTag::Discover, &["discover"]),
    (BankTag::Bendigo, &["bendigo"]),
    (BankTag::Westpac, &["westpac"]),
    (BankTag::Monese, &["monese"]),
    (BankTag::Lloyds, &["lloyds"]),
    (BankTag::Paypal, &["paypal"]),
    (BankTag::Chase, &["chase"]),
    (BankTag::Metro, &["metro"]),
    (BankTag::Becu, &["becu"]),
    (BankTag::Usaa, &["usaa"]),
    (BankTag::Pnc, &["pnc_", "pnc-", "pnc "]),
    (BankTag::Dcu, &["dcu_", "dcu-", "dcu "]),
    (BankTag::Rbc, &["rbc", "royalbank"]),
    (BankTag::Anz, &["anz_", "anz-", "anz "]),
];

/// Content fingerprints, ordered most-specific first. The order is
/// load-bearing: a Walmart MoneyCard statement also carries the issuing
/// "Green Dot Bank" footer, so Walmart's phrase must come earlier.
const CONTENT_PATTERNS: &[(BankTag, &[&str])] = &[
    (BankTag::Walmart, &["walmart moneycard"]),
    (BankTag::Commonwealth, &["commonwealth bank of australia", "commbank", "netbank"]),
    (BankTag::NavyFederal, &["navy federal credit union", "navyfederal.org"]),
    (BankTag::Dcu, &["digital federal credit union", "dcu.org"]),
    (BankTag::Becu, &["boeing employees", "becu.org", "becu"]),
    (BankTag::Nationwide, &["nationwide building society"]),
    (BankTag::Scotiabank, &["bank of nova scotia", "scotiabank"]),
    (BankTag::Rbc, &["royal bank of canada", "rbc royal bank"]),
    (BankTag::Westpac, &["westpac banking corporation", "westpac"]),
    (BankTag::Anz, &["australia and new zealand banking", "anz bank"]),
    (BankTag::Bendigo, &["bendigo and adelaide", "bendigo bank"]),
    (BankTag::GreenDot, &["green dot bank", "greendot.com"]),
    (BankTag::Netspend, &["netspend"]),
    (BankTag::Woodforest, &["woodforest national bank", "woodforest"]),
    (BankTag::WellsFargo, &["wells fargo"]),
    (BankTag::BankOfAmerica, &["bank of america"]),
    (BankTag::Chase, &["jpmorgan chase", "chase.com"]),
    (BankTag::Commerce, &["commerce bank"]),
    (BankTag::Citizens, &["citizens bank", "citizens financial"]),
    (BankTag::Suntrust, &["suntrust bank", "suntrust"]),
    (BankTag::Usaa, &["usaa federal savings", "usaa"]),
    (BankTag::Pnc, &["pnc bank", "virtual wallet"]),
    (BankTag::Discover, &["discover bank", "discover.com"]),
    (BankTag::Lloyds, &["lloyds bank", "lloyds tsb"]),
    (BankTag::Metro, &["metro bank"]),
    (BankTag::Monese, &["monese"]),
    (BankTag::Paypal, &["paypal"]),
    (BankTag::Rabobank, &["rabobank"]),
];

/// Classify a loaded document into a [`BankTag`].
///
/// Pure over already-loaded pages; never fails.
pub fn classify(doc: &StatementDocument) -> BankTag {
    let filename = doc.file_stem().unwrap_or_default().to_lowercase();

    let mut content = String::new();
    for page in 0..doc.page_count().min(CLASSIFY_PAGES) {
        content.push_str(&doc.page_text(page).to_lowercase());
        content.push('\n');
    }

    let tag = classify_text(&filename, &content);
    debug!("classified {:?} as {}", doc.file_stem(), tag);
    tag
}

/// Classification core, separated from document plumbing for testing.
pub(crate) fn classify_text(filename: &str, content: &str) -> BankTag {
    for (tag, fragments) in FILENAME_PATTERNS {
        if fragments.iter().any(|f| filename.contains(f)) {
            return *tag;
        }
    }

    for (tag, phrases) in CONTENT_PATTERNS {
        if phrases.iter().any(|p| content.contains(p)) {
            return *tag;
        }
    }

    BankTag::Unknown
}
