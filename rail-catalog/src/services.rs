use rail_core::{CoreResult, Rule};
use rail_shared::Coach;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Paid add-ons a coach may offer
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum CoachService {
    Wifi,
    Linens,
}

impl CoachService {
    pub const ALL: [CoachService; 2] = [CoachService::Wifi, CoachService::Linens];
}

impl fmt::Display for CoachService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoachService::Wifi => write!(f, "wifi"),
            CoachService::Linens => write!(f, "linens"),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ServiceState {
    Unavailable,
    /// Part of the ticket; cannot be toggled and is never charged.
    Included,
    Selectable,
}

pub fn service_state(coach: &Coach, service: CoachService) -> ServiceState {
    let (available, included) = match service {
        CoachService::Wifi => (
            coach.have_wifi,
            coach.have_wifi && !coach.wifi_price.is_some_and(|price| price > 0.0),
        ),
        CoachService::Linens => (
            coach.have_linens || coach.is_linens_included,
            coach.is_linens_included,
        ),
    };

    match (available, included) {
        (false, _) => ServiceState::Unavailable,
        (true, true) => ServiceState::Included,
        (true, false) => ServiceState::Selectable,
    }
}

/// Per-seat price of a selectable service, if the coach prices it.
pub fn service_price(coach: &Coach, service: CoachService) -> Option<f64> {
    if service_state(coach, service) != ServiceState::Selectable {
        return None;
    }
    let price = match service {
        CoachService::Wifi => coach.wifi_price,
        CoachService::Linens => coach.linens_price,
    };
    price.filter(|price| *price > 0.0)
}

/// Services toggled on, keyed by coach id.
///
/// Only services switched on have an entry. Entries for coaches the user
/// later leaves are kept; pricing only charges coaches holding selected seats.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct AdditionalOptions(BTreeMap<String, BTreeMap<CoachService, bool>>);

impl AdditionalOptions {
    /// Flips a service for a coach and returns whether it is now selected.
    pub fn toggle(&mut self, coach: &Coach, service: CoachService) -> CoreResult<bool> {
        if service_state(coach, service) != ServiceState::Selectable {
            return Err(Rule::ServiceNotToggleable {
                coach_id: coach.id.clone(),
                service: service.to_string(),
            }
            .into());
        }

        let services = self.0.entry(coach.id.clone()).or_default();
        if services.remove(&service).is_some() {
            if services.is_empty() {
                self.0.remove(&coach.id);
            }
            Ok(false)
        } else {
            services.insert(service, true);
            Ok(true)
        }
    }

    pub fn is_selected(&self, coach_id: &str, service: CoachService) -> bool {
        self.0
            .get(coach_id)
            .and_then(|services| services.get(&service))
            .copied()
            .unwrap_or(false)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn coach_ids(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rail_shared::ClassType;

    fn coach(id: &str) -> Coach {
        Coach {
            id: id.to_string(),
            name: "01".to_string(),
            class_type: ClassType::Second,
            price: None,
            top_price: Some(3000.0),
            bottom_price: Some(3500.0),
            side_price: None,
            wifi_price: None,
            linens_price: None,
            have_wifi: false,
            have_linens: false,
            is_linens_included: false,
            have_air_conditioning: true,
            have_food: false,
        }
    }

    #[test]
    fn test_service_states() {
        let mut c = coach("c1");
        assert_eq!(service_state(&c, CoachService::Wifi), ServiceState::Unavailable);

        c.have_wifi = true;
        assert_eq!(service_state(&c, CoachService::Wifi), ServiceState::Included);

        c.wifi_price = Some(200.0);
        assert_eq!(service_state(&c, CoachService::Wifi), ServiceState::Selectable);
        assert_eq!(service_price(&c, CoachService::Wifi), Some(200.0));

        c.have_linens = true;
        c.linens_price = Some(150.0);
        assert_eq!(service_state(&c, CoachService::Linens), ServiceState::Selectable);
        c.is_linens_included = true;
        assert_eq!(service_state(&c, CoachService::Linens), ServiceState::Included);
        assert_eq!(service_price(&c, CoachService::Linens), None);
    }

    #[test]
    fn test_toggle_flips_presence() {
        let mut c = coach("c1");
        c.have_wifi = true;
        c.wifi_price = Some(200.0);

        let mut options = AdditionalOptions::default();
        assert!(options.toggle(&c, CoachService::Wifi).unwrap());
        assert!(options.is_selected("c1", CoachService::Wifi));
        assert!(!options.toggle(&c, CoachService::Wifi).unwrap());
        assert!(options.is_empty());
    }

    #[test]
    fn test_toggle_rejects_included_or_unavailable() {
        let mut c = coach("c1");
        c.is_linens_included = true;

        let mut options = AdditionalOptions::default();
        assert!(options.toggle(&c, CoachService::Linens).is_err());
        assert!(options.toggle(&c, CoachService::Wifi).is_err());
        assert!(options.is_empty());
    }
}
