#[cfg(test)]
mod persistence_tests {
    use crate::model::{
        CompetitorFilter, CompetitorStatus, CompetitorUpdate, NewClass, NewCompetitor, NewEvent,
    };
    use crate::persistence::test_support::{MEET_JSON, seeded_store};
    use crate::persistence::{ImportSummary, Repository, SeedData, SledStore};
    use crate::utils::error::{SeedError, StoreError};
    use chrono::{Duration, NaiveDate, TimeZone, Utc};
    use tempfile::tempdir;

    fn ids(competitors: &[crate::model::Competitor]) -> Vec<i64> {
        competitors.iter().map(|c| c.id).collect()
    }

    #[test]
    fn test_seed_import_counts() {
        let store = SledStore::temporary().unwrap();
        let summary = SeedData::from_json(MEET_JSON).unwrap().import(&store).unwrap();
        assert_eq!(
            summary,
            ImportSummary {
                events: 2,
                classes: 3,
                competitors: 4
            }
        );
        assert_eq!(store.list_events().unwrap().len(), 2);
    }

    #[test]
    fn test_find_competitors_by_class_is_ordered() {
        let store = seeded_store();
        let found = store
            .find_competitors(&CompetitorFilter::by_class(7))
            .unwrap();
        assert_eq!(ids(&found), vec![42, 43]);
    }

    #[test]
    fn test_find_competitors_by_event_and_status() {
        let store = seeded_store();
        let by_event = store
            .find_competitors(&CompetitorFilter::by_event(3))
            .unwrap();
        assert_eq!(ids(&by_event), vec![42, 43, 50]);

        let active = store
            .find_competitors(&CompetitorFilter::by_event(3).with_status(CompetitorStatus::Active))
            .unwrap();
        assert_eq!(ids(&active), vec![42, 43]);
    }

    #[test]
    fn test_find_competitors_unknown_class_is_empty() {
        let store = seeded_store();
        let found = store
            .find_competitors(&CompetitorFilter::by_class(999))
            .unwrap();
        assert!(found.is_empty());
    }

    #[test]
    fn test_find_unique_not_found() {
        let store = seeded_store();
        let err = store.find_competitor(999_999).unwrap_err();
        assert!(err.is_not_found());
        assert!(matches!(
            store.find_class(999).unwrap_err(),
            StoreError::NotFound { entity: "class", id: 999 }
        ));
    }

    #[test]
    fn test_update_persists_changes() {
        let store = seeded_store();
        let update = CompetitorUpdate {
            status: Some(CompetitorStatus::Finished),
            time: Some(2710),
            ..Default::default()
        };
        let updated = store.update_competitor(42, &update).unwrap();
        assert_eq!(updated.status, CompetitorStatus::Finished);

        let reread = store.find_competitor(42).unwrap();
        assert_eq!(reread, updated);
        assert_eq!(reread.time, Some(2710));
        assert_eq!(reread.club.as_deref(), Some("OK Linné"));
    }

    #[test]
    fn test_update_nonexistent_competitor() {
        let store = seeded_store();
        let err = store
            .update_competitor(999_999, &CompetitorUpdate::default())
            .unwrap_err();
        assert!(matches!(
            err,
            StoreError::NotFound {
                entity: "competitor",
                id: 999_999
            }
        ));
    }

    #[test]
    fn test_update_to_missing_class_is_constraint() {
        let store = seeded_store();
        let err = store
            .update_competitor(
                42,
                &CompetitorUpdate {
                    class_id: Some(1234),
                    ..Default::default()
                },
            )
            .unwrap_err();
        assert!(matches!(err, StoreError::Constraint(_)));
        assert_eq!(store.find_competitor(42).unwrap().class_id, 7);
    }

    #[test]
    fn test_update_rejects_empty_name() {
        let store = seeded_store();
        let err = store
            .update_competitor(
                43,
                &CompetitorUpdate {
                    last_name: Some("  ".to_string()),
                    ..Default::default()
                },
            )
            .unwrap_err();
        assert!(matches!(err, StoreError::Constraint(_)));
        assert_eq!(store.find_competitor(43).unwrap().last_name, "Ek");
    }

    #[test]
    fn test_create_allocates_after_highest_id() {
        let store = seeded_store();
        let created = store
            .create_competitor(NewCompetitor {
                id: None,
                class_id: 8,
                first_name: "Maja".to_string(),
                last_name: "Strand".to_string(),
                club: None,
                card_number: Some(8_123_456),
                status: CompetitorStatus::Inactive,
            })
            .unwrap();
        assert_eq!(created.id, 61);
        assert_eq!(
            ids(&store.find_competitors(&CompetitorFilter::by_class(8)).unwrap()),
            vec![50, 61]
        );
    }

    #[test]
    fn test_create_requires_parent() {
        let store = seeded_store();
        let err = store
            .create_class(NewClass {
                id: None,
                event_id: 77,
                name: "H45".to_string(),
            })
            .unwrap_err();
        assert!(matches!(err, StoreError::Constraint(_)));

        let err = store
            .create_competitor(NewCompetitor {
                id: None,
                class_id: 77,
                first_name: "A".to_string(),
                last_name: "B".to_string(),
                club: None,
                card_number: None,
                status: CompetitorStatus::Inactive,
            })
            .unwrap_err();
        assert!(matches!(err, StoreError::Constraint(_)));
    }

    #[test]
    fn test_duplicate_and_non_positive_ids_rejected() {
        let store = seeded_store();
        let dup = store.create_event(NewEvent {
            id: Some(3),
            name: "Again".to_string(),
            date: NaiveDate::from_ymd_opt(2026, 6, 1).unwrap(),
            location: None,
        });
        assert!(matches!(dup, Err(StoreError::Constraint(_))));

        let zero = store.create_event(NewEvent {
            id: Some(0),
            name: "Zero".to_string(),
            date: NaiveDate::from_ymd_opt(2026, 6, 1).unwrap(),
            location: None,
        });
        assert!(matches!(zero, Err(StoreError::Constraint(_))));
    }

    fn runner(id: Option<i64>) -> NewCompetitor {
        NewCompetitor {
            id,
            class_id: 8,
            first_name: "Maja".to_string(),
            last_name: "Strand".to_string(),
            club: None,
            card_number: None,
            status: CompetitorStatus::Inactive,
        }
    }

    #[test]
    fn test_create_after_max_id_is_constraint() {
        let store = seeded_store();
        let top = store.create_competitor(runner(Some(i64::MAX))).unwrap();
        assert_eq!(top.id, i64::MAX);

        let err = store.create_competitor(runner(None)).unwrap_err();
        assert!(matches!(err, StoreError::Constraint(ref msg) if msg == "id space exhausted"));
        assert_eq!(
            ids(&store.find_competitors(&CompetitorFilter::by_class(8)).unwrap()),
            vec![50, i64::MAX]
        );
    }

    #[test]
    fn test_finish_before_start_is_constraint() {
        let store = seeded_store();
        let start = Utc.with_ymd_and_hms(2026, 5, 1, 10, 0, 0).unwrap();
        let err = store
            .update_competitor(
                42,
                &CompetitorUpdate {
                    start_time: Some(start),
                    finish_time: Some(start - Duration::seconds(30)),
                    ..Default::default()
                },
            )
            .unwrap_err();
        assert!(matches!(err, StoreError::Constraint(_)));

        let unchanged = store.find_competitor(42).unwrap();
        assert_eq!(unchanged.start_time, None);
        assert_eq!(unchanged.finish_time, None);
    }

    #[test]
    fn test_revise_returns_previous_record() {
        let store = seeded_store();
        let revision = store
            .revise_competitor(
                43,
                &CompetitorUpdate {
                    class_id: Some(8),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(revision.before.class_id, 7);
        assert_eq!(revision.after.class_id, 8);
        assert_eq!(store.find_competitor(43).unwrap(), revision.after);
    }

    #[test]
    fn test_delete_competitor() {
        let store = seeded_store();
        let removed = store.delete_competitor(43).unwrap();
        assert_eq!(removed.id, 43);
        assert!(store.find_competitor(43).unwrap_err().is_not_found());
        assert!(store.delete_competitor(43).unwrap_err().is_not_found());
    }

    #[test]
    fn test_classes_by_event() {
        let store = seeded_store();
        let classes = store.classes_by_event(3).unwrap();
        let names: Vec<_> = classes.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["H21", "D21"]);
        assert!(store.classes_by_event(99).unwrap().is_empty());
    }

    #[test]
    fn test_data_survives_reopen() {
        let dir = tempdir().unwrap();
        {
            let store = SledStore::open(dir.path()).unwrap();
            SeedData::from_json(MEET_JSON).unwrap().import(&store).unwrap();
            store.flush().unwrap();
        }

        let store = SledStore::open(dir.path()).unwrap();
        assert_eq!(store.find_competitor(42).unwrap().first_name, "Ada");
        assert_eq!(store.find_event(4).unwrap().name, "Night Sprint");
    }

    #[test]
    fn test_seed_from_path_reports_bad_json() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("seed.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(SeedData::from_path(&path), Err(SeedError::Parse(_))));
        assert!(matches!(
            SeedData::from_path(dir.path().join("missing.json")),
            Err(SeedError::Io(_))
        ));
    }
}
