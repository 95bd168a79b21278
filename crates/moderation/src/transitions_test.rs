#[cfg(test)]
mod tests {
    use common::models::{actions, ItemStatus, ModerationStatus};
    use common::Error;
    use db::FailPoint;
    use uuid::Uuid;

    use crate::tests::Harness;
    use crate::views;

    #[tokio::test]
    async fn test_approve_pays_owner_exactly_once() {
        // owner starts at 2 points, upload_item pays 0.5
        let h = Harness::new().await;
        h.set_point_value(actions::UPLOAD_ITEM, 0.5).await;
        let moderator = h.moderator().await;
        let owner = h.member(2.0).await;
        let item = h.store.add_item(Some(owner.user_id), false).await;

        h.service.approve_item(Some(&moderator), item.id).await.unwrap();

        let item = h.store.item(item.id).await.unwrap();
        assert_eq!(item.status, ItemStatus::Active);
        assert!(item.upload_points_awarded);
        assert_eq!(h.points(owner).await, 2.5);
    }

    #[tokio::test]
    async fn test_zero_reward_still_marks_item() {
        let h = Harness::new().await;
        h.set_point_value(actions::UPLOAD_ITEM, 0.0).await;
        let moderator = h.moderator().await;
        let owner = h.member(3.0).await;
        let item = h.store.add_item(Some(owner.user_id), false).await;

        h.service.approve_item(Some(&moderator), item.id).await.unwrap();

        assert!(h.store.item(item.id).await.unwrap().upload_points_awarded);
        assert_eq!(h.points(owner).await, 3.0);
    }

    #[tokio::test]
    async fn test_guest_item_approval_touches_no_profile() {
        let h = Harness::new().await;
        h.set_point_value(actions::UPLOAD_ITEM, 5.0).await;
        let moderator = h.moderator().await;
        let item = h.store.add_item(None, false).await;

        h.service.approve_item(Some(&moderator), item.id).await.unwrap();

        let item = h.store.item(item.id).await.unwrap();
        assert_eq!(item.status, ItemStatus::Active);
        assert!(!item.upload_points_awarded);
        assert_eq!(h.store.increment_count().await, 0);
        assert_eq!(h.points(moderator).await, 0.0);
    }

    #[tokio::test]
    async fn test_reapproving_awarded_item_pays_nothing() {
        // owner already paid for this item
        let h = Harness::new().await;
        h.set_point_value(actions::UPLOAD_ITEM, 5.0).await;
        let admin = h.admin().await;
        let owner = h.member(10.0).await;
        let item = h.store.add_item(Some(owner.user_id), true).await;

        h.service.approve_item(Some(&admin), item.id).await.unwrap();
        h.service.approve_item(Some(&admin), item.id).await.unwrap();

        assert_eq!(h.points(owner).await, 10.0);
    }

    #[tokio::test]
    async fn test_reject_then_approve_cycle_pays_once() {
        let h = Harness::new().await;
        h.set_point_value(actions::UPLOAD_ITEM, 1.0).await;
        let moderator = h.moderator().await;
        let owner = h.member(0.0).await;
        let item = h.store.add_item(Some(owner.user_id), false).await;

        h.service.approve_item(Some(&moderator), item.id).await.unwrap();
        h.service
            .reject_item(Some(&moderator), item.id, Some("wrong category"))
            .await
            .unwrap();
        h.service.approve_item(Some(&moderator), item.id).await.unwrap();

        assert_eq!(h.points(owner).await, 1.0);
    }

    #[tokio::test]
    async fn test_reject_persists_reason() {
        let h = Harness::new().await;
        let moderator = h.moderator().await;
        let item = h.store.add_item(None, false).await;

        h.service
            .reject_item(Some(&moderator), item.id, Some("duplicate listing"))
            .await
            .unwrap();

        let item = h.store.item(item.id).await.unwrap();
        assert_eq!(item.status, ItemStatus::Rejected);
        assert_eq!(item.rejection_reason.as_deref(), Some("duplicate listing"));
    }

    #[tokio::test]
    async fn test_reject_without_reason_keeps_previous_reason() {
        let h = Harness::new().await;
        let moderator = h.moderator().await;
        let item = h.store.add_item(None, false).await;

        h.service
            .reject_item(Some(&moderator), item.id, Some("blurry photos"))
            .await
            .unwrap();
        h.service
            .reject_item(Some(&moderator), item.id, None)
            .await
            .unwrap();
        h.service
            .reject_item(Some(&moderator), item.id, Some("   "))
            .await
            .unwrap();

        let item = h.store.item(item.id).await.unwrap();
        assert_eq!(item.rejection_reason.as_deref(), Some("blurry photos"));
    }

    #[tokio::test]
    async fn test_approve_ignores_reason() {
        let h = Harness::new().await;
        let moderator = h.moderator().await;
        let item = h.store.add_item(None, false).await;

        h.service
            .set_item_status(
                Some(&moderator),
                item.id,
                ModerationStatus::Active,
                Some("looks fine"),
            )
            .await
            .unwrap();

        assert_eq!(h.store.item(item.id).await.unwrap().rejection_reason, None);
    }

    #[tokio::test]
    async fn test_non_staff_cannot_moderate_and_nothing_changes() {
        let h = Harness::new().await;
        h.set_point_value(actions::UPLOAD_ITEM, 5.0).await;
        let owner = h.member(0.0).await;
        let item = h.store.add_item(Some(owner.user_id), false).await;

        for caller in [None, Some(owner)] {
            let err = h
                .service
                .approve_item(caller.as_ref(), item.id)
                .await
                .unwrap_err();
            assert!(matches!(err, Error::Unauthorized(_)));

            let err = h
                .service
                .reject_item(caller.as_ref(), item.id, Some("spam"))
                .await
                .unwrap_err();
            assert!(matches!(err, Error::Unauthorized(_)));
        }

        let unchanged = h.store.item(item.id).await.unwrap();
        assert_eq!(unchanged.status, ItemStatus::Pending);
        assert_eq!(unchanged.rejection_reason, None);
        assert!(!unchanged.upload_points_awarded);
        assert_eq!(h.points(owner).await, 0.0);
        assert_eq!(h.invalidation_count(), 0);
    }

    #[tokio::test]
    async fn test_unknown_item_is_not_found() {
        let h = Harness::new().await;
        let moderator = h.moderator().await;

        let err = h
            .service
            .approve_item(Some(&moderator), Uuid::new_v4())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
        assert_eq!(h.invalidation_count(), 0);
    }

    #[tokio::test]
    async fn test_status_write_failure_is_returned() {
        let h = Harness::new().await;
        let moderator = h.moderator().await;
        let item = h.store.add_item(None, false).await;
        h.store.fail(FailPoint::ItemStatusUpdate).await;

        let err = h
            .service
            .approve_item(Some(&moderator), item.id)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Database(_)));
    }

    #[tokio::test]
    async fn test_award_failure_does_not_fail_approval() {
        let h = Harness::new().await;
        h.set_point_value(actions::UPLOAD_ITEM, 5.0).await;
        let moderator = h.moderator().await;
        let owner = h.member(0.0).await;
        let item = h.store.add_item(Some(owner.user_id), false).await;
        h.store.fail(FailPoint::Increment).await;

        h.service.approve_item(Some(&moderator), item.id).await.unwrap();

        let item = h.store.item(item.id).await.unwrap();
        assert_eq!(item.status, ItemStatus::Active);
        assert!(!item.upload_points_awarded);
        assert_eq!(h.points(owner).await, 0.0);
    }

    #[tokio::test]
    async fn test_lookup_failure_does_not_fail_approval() {
        let h = Harness::new().await;
        let moderator = h.moderator().await;
        let owner = h.member(0.0).await;
        let item = h.store.add_item(Some(owner.user_id), false).await;
        h.store.fail(FailPoint::ItemAwardState).await;

        h.service.approve_item(Some(&moderator), item.id).await.unwrap();

        assert_eq!(
            h.store.item(item.id).await.unwrap().status,
            ItemStatus::Active
        );
    }

    #[tokio::test]
    async fn test_success_invalidates_item_views() {
        let h = Harness::new().await;
        let moderator = h.moderator().await;
        let item = h.store.add_item(None, false).await;

        h.service.approve_item(Some(&moderator), item.id).await.unwrap();

        let seen = h.revalidator.invalidations();
        assert_eq!(seen, vec![views::item(item.id)]);
        assert!(seen[0].paths.contains(&format!("/items/{}", item.id)));
        assert!(seen[0].paths.contains(&"/admin/moderation".to_string()));
    }
}
