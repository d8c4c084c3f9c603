//! Postal address domain used by the bundled recipes.
//!
//! An [`Address`] is either a street address or a post office box. The
//! variant is part of the value, so callers match on it instead of
//! inspecting types at runtime.

use std::fmt;

/// Countries an address may belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Country {
    Germany,
    Austria,
    Switzerland,
}

impl Country {
    /// Every country, in declaration order.
    pub const ALL: [Country; 3] = [Country::Germany, Country::Austria, Country::Switzerland];
}

impl fmt::Display for Country {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Country::Germany => "Germany",
            Country::Austria => "Austria",
            Country::Switzerland => "Switzerland",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreetAddress {
    pub country: Country,
    pub city: String,
    pub zip_code: String,
    pub street: String,
    /// House number, with an addendum after a slash when there is one.
    pub house_number: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostOfficeBox {
    pub country: Country,
    pub city: String,
    pub zip_code: String,
    pub identifier: String,
}

/// A deliverable address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Address {
    Street(StreetAddress),
    PostOfficeBox(PostOfficeBox),
}

impl Address {
    pub fn country(&self) -> Country {
        match self {
            Address::Street(address) => address.country,
            Address::PostOfficeBox(pob) => pob.country,
        }
    }

    pub fn city(&self) -> &str {
        match self {
            Address::Street(address) => &address.city,
            Address::PostOfficeBox(pob) => &pob.city,
        }
    }

    /// The zip code, if the address has one.
    pub fn zip_code(&self) -> Option<&str> {
        let zip = match self {
            Address::Street(address) => &address.zip_code,
            Address::PostOfficeBox(pob) => &pob.zip_code,
        };
        (!zip.is_empty()).then_some(zip.as_str())
    }

    pub fn is_street(&self) -> bool {
        matches!(self, Address::Street(_))
    }

    pub fn is_post_office_box(&self) -> bool {
        matches!(self, Address::PostOfficeBox(_))
    }
}

impl From<StreetAddress> for Address {
    fn from(address: StreetAddress) -> Self {
        Address::Street(address)
    }
}

impl From<PostOfficeBox> for Address {
    fn from(pob: PostOfficeBox) -> Self {
        Address::PostOfficeBox(pob)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Address::Street(a) => write!(
                f,
                "{} {}, {} {}, {}",
                a.street, a.house_number, a.zip_code, a.city, a.country
            ),
            Address::PostOfficeBox(p) => write!(
                f,
                "PO Box {}, {} {}, {}",
                p.identifier, p.zip_code, p.city, p.country
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn street() -> StreetAddress {
        StreetAddress {
            country: Country::Germany,
            city: "Bonn".to_string(),
            zip_code: "53111".to_string(),
            street: "Markt".to_string(),
            house_number: "12/3".to_string(),
        }
    }

    #[test]
    fn test_accessors_see_through_variants() {
        let address = Address::from(street());
        assert_eq!(address.city(), "Bonn");
        assert_eq!(address.zip_code(), Some("53111"));
        assert!(address.is_street());

        let pob = Address::from(PostOfficeBox {
            country: Country::Austria,
            city: "Linz".to_string(),
            zip_code: String::new(),
            identifier: "A7".to_string(),
        });
        assert_eq!(pob.country(), Country::Austria);
        assert_eq!(pob.zip_code(), None);
        assert!(pob.is_post_office_box());
    }

    #[test]
    fn test_display() {
        assert_eq!(
            Address::from(street()).to_string(),
            "Markt 12/3, 53111 Bonn, Germany"
        );
    }
}
