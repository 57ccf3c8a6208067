//! Country-specific symbol formatting.

use market_core::AssetClass;

/// Apply country-specific exchange suffixing to an equity symbol.
///
/// Crypto and forex symbols are global and pass through untouched, as
/// do symbols that already carry an exchange suffix.
pub fn format_symbol(symbol: &str, asset_class: AssetClass, country: Option<&str>) -> String {
    let symbol = symbol.trim().to_uppercase();

    if !asset_class.is_equity() || symbol.contains('.') {
        return symbol;
    }

    let Some(country) = country else {
        return symbol;
    };

    let suffix = match country.to_uppercase().as_str() {
        "IN" => ".NS",
        "GB" | "UK" => ".L",
        "CA" => ".TO",
        "AU" => ".AX",
        "DE" => ".DE",
        "JP" => ".T",
        "HK" => ".HK",
        // US listings and unknown countries use the bare symbol
        _ => return symbol,
    };

    format!("{}{}", symbol, suffix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equity_suffixing() {
        assert_eq!(
            format_symbol("reliance", AssetClass::Stock, Some("IN")),
            "RELIANCE.NS"
        );
        assert_eq!(
            format_symbol("VOD", AssetClass::Stock, Some("gb")),
            "VOD.L"
        );
        assert_eq!(format_symbol("SHOP", AssetClass::Etf, Some("CA")), "SHOP.TO");
    }

    #[test]
    fn test_us_and_unknown_countries_pass_through() {
        assert_eq!(format_symbol("AAPL", AssetClass::Stock, Some("US")), "AAPL");
        assert_eq!(format_symbol("AAPL", AssetClass::Stock, Some("ZZ")), "AAPL");
        assert_eq!(format_symbol("AAPL", AssetClass::Stock, None), "AAPL");
    }

    #[test]
    fn test_non_equity_never_suffixed() {
        assert_eq!(format_symbol("BTC", AssetClass::Crypto, Some("IN")), "BTC");
        assert_eq!(
            format_symbol("EURUSD", AssetClass::Forex, Some("GB")),
            "EURUSD"
        );
    }

    #[test]
    fn test_existing_suffix_kept() {
        assert_eq!(
            format_symbol("VOD.L", AssetClass::Stock, Some("IN")),
            "VOD.L"
        );
    }
}
