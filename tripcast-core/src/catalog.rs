use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Airport {
    pub iata: String,
    pub city: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Country {
    /// ISO 3166-1 alpha-2
    pub code: String,
    pub name: String,
    pub airports: Vec<Airport>,
}

impl Country {
    fn new(code: &str, name: &str, airports: &[(&str, &str)]) -> Self {
        Self {
            code: code.to_string(),
            name: name.to_string(),
            airports: airports
                .iter()
                .map(|(iata, city)| Airport {
                    iata: iata.to_string(),
                    city: city.to_string(),
                })
                .collect(),
        }
    }

    /// Lightweight reference stored on recommendations.
    pub fn reference(&self) -> CountryRef {
        CountryRef {
            code: self.code.clone(),
            name: self.name.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct CountryRef {
    pub code: String,
    pub name: String,
}

/// Candidate destinations considered for every month.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DestinationCatalog {
    countries: Vec<Country>,
}

impl DestinationCatalog {
    pub fn new(countries: Vec<Country>) -> Self {
        Self { countries }
    }

    pub fn countries(&self) -> &[Country] {
        &self.countries
    }

    pub fn find_airport(&self, iata: &str) -> Option<(&Country, &Airport)> {
        self.countries.iter().find_map(|country| {
            country
                .airports
                .iter()
                .find(|a| a.iata == iata)
                .map(|airport| (country, airport))
        })
    }
}

impl Default for DestinationCatalog {
    fn default() -> Self {
        Self::new(vec![
            Country::new("JP", "Japan", &[("NRT", "Tokyo"), ("KIX", "Osaka")]),
            Country::new("KR", "South Korea", &[("ICN", "Seoul")]),
            Country::new("SG", "Singapore", &[("SIN", "Singapore")]),
            Country::new("HK", "Hong Kong", &[("HKG", "Hong Kong")]),
            Country::new("TW", "Taiwan", &[("TPE", "Taipei")]),
            Country::new("TH", "Thailand", &[("BKK", "Bangkok")]),
            Country::new("VN", "Vietnam", &[("SGN", "Ho Chi Minh City"), ("HAN", "Hanoi")]),
            Country::new(
                "US",
                "United States",
                &[("SFO", "San Francisco"), ("LAX", "Los Angeles"), ("JFK", "New York")],
            ),
            Country::new("GB", "United Kingdom", &[("LHR", "London")]),
            Country::new("FR", "France", &[("CDG", "Paris")]),
            Country::new("IT", "Italy", &[("FCO", "Rome")]),
        ])
    }
}
