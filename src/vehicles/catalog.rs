//! Embedded vehicle catalog used by the static data source.

use crate::vehicles::models::{PLACEHOLDER_IMAGE, VehicleRecord, VehicleSpecs};

fn specs(engine: &str, transmission: &str, mileage: &str, color: &str) -> VehicleSpecs {
    VehicleSpecs {
        engine: Some(engine.to_string()),
        transmission: Some(transmission.to_string()),
        mileage: Some(mileage.to_string()),
        color: Some(color.to_string()),
    }
}

/// The four sample vehicles shipped with the storefront, in listing order.
pub fn sample_vehicles() -> Vec<VehicleRecord> {
    vec![
        VehicleRecord::new(1, "Toyota", "Corolla", 2020, 35000.0)
            .with_image(PLACEHOLDER_IMAGE)
            .with_description("Carro econômico e confiável")
            .with_specs(specs("1.8L 4-cilindros", "Automática", "35,000 km", "Prata")),
        VehicleRecord::new(2, "Honda", "Civic", 2018, 45000.0)
            .with_image(PLACEHOLDER_IMAGE)
            .with_description("Sedã compacto e esportivo")
            .with_specs(specs("2.0L 4-cilindros", "Manual", "45,000 km", "Azul")),
        VehicleRecord::new(3, "Ford", "Mustang", 2022, 65000.0)
            .with_image(PLACEHOLDER_IMAGE)
            .with_description("Icônico muscle car")
            .with_specs(specs("5.0L V8", "Automática", "10,000 km", "Vermelho")),
        VehicleRecord::new(4, "Volkswagen", "Golf", 2019, 30000.0)
            .with_image(PLACEHOLDER_IMAGE)
            .with_description("Hatch compacto e versátil")
            .with_specs(specs("1.4L 4-cilindros", "Manual", "25,000 km", "Branco")),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_sample_vehicles_are_well_formed() {
        let vehicles = sample_vehicles();
        assert_eq!(vehicles.len(), 4);

        let ids: HashSet<_> = vehicles.iter().map(|v| v.id.clone()).collect();
        assert_eq!(ids.len(), vehicles.len());

        for vehicle in &vehicles {
            assert!(!vehicle.brand.is_empty());
            assert!(!vehicle.model.is_empty());
            assert!(vehicle.price >= 0.0);
            assert!(vehicle.year > 0);
            assert!(vehicle.specs.is_some());
        }
    }
}
