//! Static reference data: index routing set, contract lot sizes and the
//! suggested-symbol universe.
//!
//! These tables are consumed, never computed. Contract lot sizes feed the
//! spread-scan P&L conversion; the surge table (different values, different
//! default) sizes premium-surge volume into lots.

/// Symbols served by the index option-chain endpoint upstream.
pub const INDEX_SYMBOLS: [&str; 4] = ["NIFTY", "BANKNIFTY", "FINNIFTY", "MIDCPNIFTY"];

/// Returns true when the symbol routes to the index endpoint.
pub fn is_index(symbol: &str) -> bool {
    INDEX_SYMBOLS.contains(&symbol)
}

/// Contract lot sizes used to convert per-unit spread premium into total P&L.
static CONTRACT_LOT_SIZES: &[(&str, u32)] = &[
    ("360ONE", 500), ("ABB", 125), ("ABCAPITAL", 3100), ("ADANIENSOL", 675),
    ("ADANIENT", 300), ("ADANIGREEN", 600), ("ADANIPORTS", 475), ("ALKEM", 125),
    ("AMBER", 100), ("AMBUJACEM", 1050), ("ANGELONE", 250), ("APLAPOLLO", 350),
    ("APOLLOHOSP", 125), ("ASHOKLEY", 5000), ("ASIANPAINT", 250), ("ASTRAL", 425),
    ("AUBANK", 1000), ("AUROPHARMA", 550), ("AXISBANK", 625), ("BAJAJ-AUTO", 75),
    ("BAJAJFINSV", 250), ("BAJFINANCE", 750), ("BANDHANBNK", 3600), ("BANKBARODA", 2925),
    ("BANKINDIA", 5200), ("BANKNIFTY", 35), ("BDL", 325), ("BEL", 1425),
    ("BHARATFORG", 500), ("BHARTIARTL", 475), ("BHEL", 2625), ("BIOCON", 2500),
    ("BLUESTARCO", 325), ("BOSCHLTD", 25), ("BPCL", 1975), ("BRITANNIA", 125),
    ("BSE", 375), ("CAMS", 150), ("CANBK", 6750), ("CDSL", 475),
    ("CGPOWER", 850), ("CHOLAFIN", 625), ("CIPLA", 375), ("COALINDIA", 1350),
    ("COFORGE", 375), ("COLPAL", 225), ("CONCOR", 1250), ("CROMPTON", 1800),
    ("CUMMINSIND", 200), ("CYIENT", 425), ("DABUR", 1250), ("DALBHARAT", 325),
    ("DELHIVERY", 2075), ("DIVISLAB", 100), ("DIXON", 50), ("DLF", 825),
    ("DMART", 150), ("DRREDDY", 625), ("EICHERMOT", 175), ("ETERNAL", 2425),
    ("EXIDEIND", 1800), ("FEDERALBNK", 5000), ("FINNIFTY", 65), ("FORTIS", 775),
    ("GAIL", 3150), ("GLENMARK", 375), ("GMRAIRPORT", 6975), ("GODREJCP", 500),
    ("GODREJPROP", 275), ("GRASIM", 250), ("HAL", 150), ("HAVELLS", 500),
    ("HCLTECH", 350), ("HDFCAMC", 150), ("HDFCBANK", 550), ("HDFCLIFE", 1100),
    ("HEROMOTOCO", 150), ("HFCL", 6450), ("HINDALCO", 700), ("HINDPETRO", 2025),
    ("HINDUNILVR", 300), ("HINDZINC", 1225), ("HUDCO", 2775), ("ICICIBANK", 700),
    ("ICICIGI", 325), ("ICICIPRULI", 925), ("IDEA", 71475), ("IDFCFIRSTB", 9275),
    ("IEX", 3750), ("IGL", 2750), ("IIFL", 1650), ("INDHOTEL", 1000),
    ("INDIANB", 1000), ("INDIGO", 150), ("INDUSINDBK", 700), ("INDUSTOWER", 1700),
    ("INFY", 400), ("INOXWIND", 3272), ("IOC", 4875), ("IRCTC", 875),
    ("IREDA", 3450), ("IRFC", 4250), ("ITC", 1600), ("JINDALSTEL", 625),
    ("JIOFIN", 2350), ("JSWENERGY", 1000), ("JSWSTEEL", 675), ("JUBLFOOD", 1250),
    ("KALYANKJIL", 1175), ("KAYNES", 100), ("KEI", 175), ("KFINTECH", 450),
    ("KOTAKBANK", 400), ("KPITTECH", 400), ("LAURUSLABS", 850), ("LICHSGFIN", 1000),
    ("LICI", 700), ("LODHA", 450), ("LT", 175), ("LTF", 4462),
    ("LTIM", 150), ("LUPIN", 425), ("M&M", 200), ("MANAPPURAM", 3000),
    ("MANKIND", 225), ("MARICO", 1200), ("MARUTI", 50), ("MAXHEALTH", 525),
    ("MAZDOCK", 175), ("MCX", 125), ("MFSL", 400), ("MIDCPNIFTY", 140),
    ("MOTHERSON", 6150), ("MPHASIS", 275), ("MUTHOOTFIN", 275), ("NATIONALUM", 3750),
    ("NAUKRI", 375), ("NBCC", 6500), ("NCC", 2700), ("NESTLEIND", 500),
    ("NHPC", 6400), ("NIFTY", 75), ("NMDC", 6750), ("NTPC", 1500),
    ("NUVAMA", 75), ("NYKAA", 3125), ("OBEROIRLTY", 350), ("OFSS", 75),
    ("OIL", 1400), ("ONGC", 2250), ("PAGEIND", 15), ("PATANJALI", 900),
    ("PAYTM", 725), ("PERSISTENT", 100), ("PETRONET", 1800), ("PFC", 1300),
    ("PGEL", 700), ("PHOENIXLTD", 350), ("PIDILITIND", 500), ("PIIND", 175),
    ("PNB", 8000), ("PNBHOUSING", 650), ("POLICYBZR", 350), ("POLYCAB", 125),
    ("POWERGRID", 1900), ("POWERINDIA", 50), ("PPLPHARMA", 2500), ("PRESTIGE", 450),
    ("RBLBANK", 3175), ("RECLTD", 1275), ("RELIANCE", 500), ("RVNL", 1375),
    ("SAIL", 4700), ("SAMMAANCAP", 4300), ("SBICARD", 800), ("SBILIFE", 375),
    ("SBIN", 750), ("SHREECEM", 25), ("SHRIRAMFIN", 825), ("SIEMENS", 125),
    ("SOLARINDS", 75), ("SONACOMS", 1050), ("SRF", 200), ("SUNPHARMA", 350),
    ("SUPREMEIND", 175), ("SUZLON", 8000), ("SYNGENE", 1000), ("TATACONSUM", 550),
    ("TATAELXSI", 100), ("TATAPOWER", 1450), ("TATASTEEL", 5500), ("TATATECH", 800),
    ("TCS", 175), ("TECHM", 600), ("TIINDIA", 200), ("TITAGARH", 725),
    ("TITAN", 175), ("TMPV", 800), ("TORNTPHARM", 250), ("TORNTPOWER", 375),
    ("TRENT", 100), ("TVSMOTOR", 175), ("ULTRACEMCO", 50), ("UNIONBANK", 4425),
    ("UNITDSPR", 400), ("UNOMINDA", 550), ("UPL", 1355), ("VBL", 1025),
    ("VEDL", 1150), ("VOLTAS", 375), ("WIPRO", 3000), ("YESBANK", 31100),
    ("ZYDUSLIFE", 900),];

/// Lot size for spread P&L sizing. Unknown symbols fall back to 1 so the
/// reported total equals the per-lot net.
pub fn contract_lot_size(symbol: &str) -> u32 {
    CONTRACT_LOT_SIZES
        .iter()
        .find(|(s, _)| *s == symbol)
        .map(|(_, n)| *n)
        .unwrap_or(1)
}

/// Lot size used to bucket surge volume into lots. Only the major indices
/// carry overrides; everything else defaults to 50.
pub fn surge_lot_size(symbol: &str) -> u32 {
    match symbol {
        "NIFTY" => 25,
        "BANKNIFTY" => 15,
        "FINNIFTY" => 25,
        "MIDCPNIFTY" => 50,
        "SENSEX" => 10,
        "SENSEX50" => 15,
        "INDIAVIX" => 100,
        _ => 50,
    }
}

/// Popular F&O symbols offered to clients as scan candidates.
static SUGGESTED_SYMBOLS: &[&str] = &[
    "360ONE", "ABB", "APLAPOLLO", "AUBANK", "ADANIENSOL", "ADANIENT", "ADANIGREEN", "ADANIPORTS",
    "ABCAPITAL", "ALKEM", "AMBER", "AMBUJACEM", "ANGELONE", "APOLLOHOSP", "ASHOKLEY", "ASIANPAINT",
    "ASTRAL", "AUROPHARMA", "DMART", "AXISBANK", "BSE", "BAJAJ-AUTO", "BAJFINANCE", "BAJAJFINSV",
    "BANDHANBNK", "BANKBARODA", "BANKINDIA", "BDL", "BEL", "BHARATFORG", "BHEL", "BPCL",
    "BHARTIARTL", "BIOCON", "BLUESTARCO", "BOSCHLTD", "BRITANNIA", "CGPOWER", "CANBK", "CDSL",
    "CHOLAFIN", "CIPLA", "COALINDIA", "COFORGE", "COLPAL", "CAMS", "CONCOR", "CROMPTON",
    "CUMMINSIND", "CYIENT", "DLF", "DABUR", "DALBHARAT", "DELHIVERY", "DIVISLAB", "DIXON",
    "DRREDDY", "ETERNAL", "EICHERMOT", "EXIDEIND", "NYKAA", "FORTIS", "GAIL", "GMRAIRPORT",
    "GLENMARK", "GODREJCP", "GODREJPROP", "GRASIM", "HCLTECH", "HDFCAMC", "HDFCBANK", "HDFCLIFE",
    "HFCL", "HAVELLS", "HEROMOTOCO", "HINDALCO", "HAL", "HINDPETRO", "HINDUNILVR", "HINDZINC",
    "POWERINDIA", "HUDCO", "ICICIBANK", "ICICIGI", "ICICIPRULI", "IDFCFIRSTB", "IIFL", "ITC",
    "INDIANB", "IEX", "IOC", "IRCTC", "IRFC", "IREDA", "IGL", "INDUSTOWER",
    "INDUSINDBK", "NAUKRI", "INFY", "INOXWIND", "INDIGO", "JINDALSTEL", "JSWENERGY", "JSWSTEEL",
    "JIOFIN", "JUBLFOOD", "KEI", "KPITTECH", "KALYANKJIL", "KAYNES", "KFINTECH", "KOTAKBANK",
    "LTF", "LICHSGFIN", "LTIM", "LT", "LAURUSLABS", "LICI", "LODHA", "LUPIN",
    "M&M", "MANAPPURAM", "MANKIND", "MARICO", "MARUTI", "MFSL", "MAXHEALTH", "MAZDOCK",
    "MPHASIS", "MCX", "MUTHOOTFIN", "NBCC", "NCC", "NHPC", "NMDC", "NTPC",
    "NATIONALUM", "NESTLEIND", "NUVAMA", "OBEROIRLTY", "ONGC", "OIL", "PAYTM", "OFSS",
    "POLICYBZR", "PGEL", "PIIND", "PNBHOUSING", "PAGEIND", "PATANJALI", "PERSISTENT", "PETRONET",
    "PIDILITIND", "PPLPHARMA", "POLYCAB", "PFC", "POWERGRID", "PRESTIGE", "PNB", "RBLBANK",
    "RECLTD", "RVNL", "RELIANCE", "SBICARD", "SBILIFE", "SHREECEM", "SRF", "SAMMAANCAP",
    "MOTHERSON", "SHRIRAMFIN", "SIEMENS", "SOLARINDS", "SONACOMS", "SBIN", "SAIL", "SUNPHARMA",
    "SUPREMEIND", "SUZLON", "SYNGENE", "TATACONSUM", "TITAGARH", "TVSMOTOR", "TCS", "TATAELXSI",
    "TMPV", "TATAPOWER", "TATASTEEL", "TATATECH", "TECHM", "FEDERALBNK", "INDHOTEL", "PHOENIXLTD",
    "TITAN", "TORNTPHARM", "TORNTPOWER", "TRENT", "TIINDIA", "UNOMINDA", "UPL", "ULTRACEMCO",
    "UNIONBANK", "UNITDSPR", "VBL", "VEDL", "IDEA", "VOLTAS", "WIPRO", "YESBANK",
    "ZYDUSLIFE",];

/// Returns the suggested-symbol universe.
pub fn suggested_symbols() -> &'static [&'static str] {
    SUGGESTED_SYMBOLS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_symbols_route_to_index_endpoint() {
        assert!(is_index("NIFTY"));
        assert!(is_index("BANKNIFTY"));
        assert!(!is_index("SBIN"));
        assert!(!is_index("nifty"));
    }

    #[test]
    fn contract_lot_size_lookup() {
        assert_eq!(contract_lot_size("NIFTY"), 75);
        assert_eq!(contract_lot_size("RELIANCE"), 500);
        assert_eq!(contract_lot_size("UNKNOWN"), 1);
    }

    #[test]
    fn surge_lot_size_defaults_to_fifty() {
        assert_eq!(surge_lot_size("NIFTY"), 25);
        assert_eq!(surge_lot_size("BANKNIFTY"), 15);
        assert_eq!(surge_lot_size("SBIN"), 50);
    }

    #[test]
    fn suggested_universe_is_populated() {
        let symbols = suggested_symbols();
        assert!(symbols.len() > 100);
        assert!(symbols.contains(&"RELIANCE"));
        assert!(symbols.iter().all(|s| !s.is_empty()));
    }

    #[test]
    fn contract_table_has_no_duplicates() {
        let mut seen = std::collections::HashSet::new();
        for (sym, _) in super::CONTRACT_LOT_SIZES {
            assert!(seen.insert(*sym), "duplicate lot entry: {sym}");
        }
    }
}
