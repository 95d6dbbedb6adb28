use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::MarketDataError;

/// Market an equity is listed on, keyed by ISO 3166 alpha-3 country code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Market {
    Usa,
    Gbr,
    Can,
    Aus,
    Hkg,
    Jpn,
    Chn,
    Twn,
    Kor,
    Ind,
    Deu,
    Fra,
    Sgp,
    Nzl,
    Bra,
    Che,
    Nld,
    Esp,
    Ita,
    Swe,
    Mex,
}

impl Market {
    /// Market whose tickers are used without a suffix.
    pub const HOME: Market = Market::Usa;

    pub const ALL: &'static [Market] = &[
        Market::Usa,
        Market::Gbr,
        Market::Can,
        Market::Aus,
        Market::Hkg,
        Market::Jpn,
        Market::Chn,
        Market::Twn,
        Market::Kor,
        Market::Ind,
        Market::Deu,
        Market::Fra,
        Market::Sgp,
        Market::Nzl,
        Market::Bra,
        Market::Che,
        Market::Nld,
        Market::Esp,
        Market::Ita,
        Market::Swe,
        Market::Mex,
    ];

    /// ISO 3166 alpha-3 code.
    pub fn code(self) -> &'static str {
        match self {
            Market::Usa => "USA",
            Market::Gbr => "GBR",
            Market::Can => "CAN",
            Market::Aus => "AUS",
            Market::Hkg => "HKG",
            Market::Jpn => "JPN",
            Market::Chn => "CHN",
            Market::Twn => "TWN",
            Market::Kor => "KOR",
            Market::Ind => "IND",
            Market::Deu => "DEU",
            Market::Fra => "FRA",
            Market::Sgp => "SGP",
            Market::Nzl => "NZL",
            Market::Bra => "BRA",
            Market::Che => "CHE",
            Market::Nld => "NLD",
            Market::Esp => "ESP",
            Market::Ita => "ITA",
            Market::Swe => "SWE",
            Market::Mex => "MEX",
        }
    }

    /// Exchange suffix appended to tickers of this market (e.g. "L" for London).
    ///
    /// The home market has no suffix.
    pub fn short_code(self) -> Option<&'static str> {
        let suffix = match self {
            Market::Usa => return None,
            Market::Gbr => "L",
            Market::Can => "TO",
            Market::Aus => "AX",
            Market::Hkg => "HK",
            Market::Jpn => "T",
            Market::Chn => "SS",
            Market::Twn => "TW",
            Market::Kor => "KS",
            Market::Ind => "NS",
            Market::Deu => "DE",
            Market::Fra => "PA",
            Market::Sgp => "SI",
            Market::Nzl => "NZ",
            Market::Bra => "SA",
            Market::Che => "SW",
            Market::Nld => "AS",
            Market::Esp => "MC",
            Market::Ita => "MI",
            Market::Swe => "ST",
            Market::Mex => "MX",
        };
        Some(suffix)
    }

    pub fn is_home(self) -> bool {
        self == Self::HOME
    }
}

impl fmt::Display for Market {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Market {
    type Err = MarketDataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim();
        Market::ALL
            .iter()
            .copied()
            .find(|m| m.code().eq_ignore_ascii_case(code))
            .ok_or_else(|| MarketDataError::UnknownMarket(code.to_string()))
    }
}
