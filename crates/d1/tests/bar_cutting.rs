//! Integration tests for u-cutstock-d1.

use u_cutstock_d1::{
    solve_request, Algorithm1D, CuttingRequest1D, Options1D, Packer, Packer1D, Piece1D, Stock1D,
};

mod plan_tests {
    use super::*;

    #[test]
    fn test_mixed_stock_lengths() {
        let request = CuttingRequest1D {
            pieces: vec![
                Piece1D::new("rail", 1800.0).with_quantity(4),
                Piece1D::new("post", 950.0).with_quantity(6),
                Piece1D::new("brace", 420.0).with_quantity(10),
            ],
            stock: vec![
                Stock1D::new("bar-6000", 6000.0).with_available(3),
                Stock1D::new("bar-2400", 2400.0).with_available(10),
            ],
            options: Options1D::new()
                .with_algorithm(Algorithm1D::Bfd)
                .with_kerf(4.0)
                .with_min_usable_waste(300.0),
        };

        let plan = solve_request(&request);

        assert!(plan.success, "{:?}", plan.error);
        assert_eq!(plan.statistics.total_pieces, 20);
        let placed: usize = plan.bars.iter().map(|b| b.cuts.len()).sum();
        assert_eq!(placed, 20);
        assert_eq!(plan.stock_used_count, plan.bars.len());

        let long_bars = plan.bars.iter().filter(|b| b.stock_id == "bar-6000").count();
        assert!(long_bars <= 3);

        for bar in &plan.bars {
            for pair in bar.cuts.windows(2) {
                assert!((pair[1].position - pair[0].end() - 4.0).abs() < 1e-9);
            }
            if let Some(usable) = &bar.usable_waste {
                assert!(bar.waste >= 300.0);
                assert!((usable.position + usable.length - bar.stock_length).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn test_packer_trait() {
        let packer = Packer1D::new(Options1D::new().with_algorithm(Algorithm1D::Ffd));
        assert_eq!(packer.name(), "FFD");

        let plan = packer.pack(&[Piece1D::new("P", 10.0)], &[Stock1D::new("S", 100.0)]);
        assert!(plan.success);
        assert!((plan.total_waste - 90.0).abs() < 1e-9);
        assert!((plan.total_waste_percentage - 90.0).abs() < 1e-9);
    }

    #[test]
    fn test_pieces_keep_origin() {
        let pieces = vec![Piece1D::new("L1", 500.0)
            .with_quantity(2)
            .with_origin("job-42")];
        let plan = Packer1D::default_config().solve(&pieces, &[Stock1D::new("S", 2000.0)]);

        assert!(plan.success);
        let cuts = &plan.bars[0].cuts;
        assert_eq!(cuts[0].piece_id, "L1#1");
        assert_eq!(cuts[1].piece_id, "L1#2");
        assert!(cuts.iter().all(|c| c.origin_id == "job-42"));
    }
}

#[cfg(feature = "serde")]
mod wire_tests {
    use super::*;
    use u_cutstock_d1::CuttingPlan1D;

    #[test]
    fn test_request_from_json() {
        let json = r#"{
            "pieces": [{ "id": "A", "length": 1000 , "quantity": 2 }],
            "stock": [{ "id": "S", "length": 2400, "available": 5 }],
            "options": { "algorithm": "FFD", "kerf": 3, "minUsableWaste": 100 }
        }"#;

        let request: CuttingRequest1D = serde_json::from_str(json).unwrap();
        assert_eq!(request.options.algorithm, Algorithm1D::Ffd);

        let plan = solve_request(&request);
        let value = serde_json::to_value(&plan).unwrap();

        assert_eq!(value["success"], true);
        assert_eq!(value["stockUsedCount"], 1);
        assert_eq!(value["bars"][0]["cuts"][1]["position"], 1003.0);
        assert!(value["bars"][0]["usableWaste"].is_object());
        assert!(value.get("error").is_none());

        let back: CuttingPlan1D = serde_json::from_value(value).unwrap();
        assert_eq!(back.bars[0].cuts, plan.bars[0].cuts);
    }

    #[test]
    fn test_defaults_when_omitted() {
        let json = r#"{ "pieces": [{ "id": "A", "length": 10 }], "stock": [{ "id": "S", "length": 100, "available": 1 }] }"#;
        let request: CuttingRequest1D = serde_json::from_str(json).unwrap();

        assert_eq!(request.pieces[0].quantity, 1);
        assert_eq!(request.options.algorithm, Algorithm1D::Bfd);
        assert_eq!(request.options.kerf, 0.0);
    }

    #[test]
    fn test_branch_and_bound_name() {
        let algorithm: Algorithm1D = serde_json::from_str("\"BRANCH_AND_BOUND\"").unwrap();
        assert_eq!(algorithm, Algorithm1D::BranchAndBound);
    }
}
