//! End-to-end integration tests
//!
//! These tests drive the public `WalletService` API through complete
//! scenarios:
//! 1. Build a ledger through the balance-changing operations
//! 2. Export it to a temporary directory
//! 3. Import it into a fresh service
//! 4. Compare the reconstructed collections and run aggregations over them
//!
//! Aggregation scenarios are run with several worker counts.

#[cfg(test)]
mod tests {
    use rstest::{fixture, rstest};
    use std::fs;
    use tempfile::TempDir;
    use wallet_service::{Money, PaymentStatus, WalletError, WalletService};

    /// Two accounts, four payments (one rejected), and one favorite
    #[fixture]
    fn populated() -> WalletService {
        let mut service = WalletService::new();

        let first = service.register_account("+992937452945").unwrap();
        let second = service.register_account("+992937452946").unwrap();
        service.deposit(first.id, Money(100_000)).unwrap();
        service.deposit(second.id, Money(50_000)).unwrap();

        let fuel = service.pay(first.id, Money(1_500), "auto").unwrap();
        service.pay(first.id, Money(2_000), "food").unwrap();
        let rent = service.pay(second.id, Money(30_000), "rent").unwrap();
        service.reject(&rent.id).unwrap();
        service.favorite_payment(&fuel.id, "fuel").unwrap();
        service.repeat(&fuel.id).unwrap();

        service
    }

    #[rstest]
    fn test_balances_after_scenario(populated: WalletService) {
        assert_eq!(
            populated.find_account_by_id(1).unwrap().balance,
            Money(100_000 - 1_500 - 2_000 - 1_500)
        );
        assert_eq!(populated.find_account_by_id(2).unwrap().balance, Money(50_000));
        assert_eq!(populated.payments().len(), 4);
        assert_eq!(
            populated
                .payments()
                .iter()
                .filter(|p| p.status == PaymentStatus::Fail)
                .count(),
            1
        );
    }

    #[rstest]
    fn test_export_import_round_trip(populated: WalletService) {
        let dir = TempDir::new().unwrap();
        populated.export(dir.path()).unwrap();

        let mut restored = WalletService::new();
        let summary = restored.import(dir.path());

        assert!(summary.is_clean());
        assert_eq!(summary.accounts, 2);
        assert_eq!(summary.payments, 4);
        assert_eq!(summary.favorites, 1);
        assert_eq!(restored.accounts(), populated.accounts());
        assert_eq!(restored.payments(), populated.payments());
        assert_eq!(restored.favorites(), populated.favorites());
    }

    #[rstest]
    fn test_imported_ledger_continues_account_ids(populated: WalletService) {
        let dir = TempDir::new().unwrap();
        populated.export(dir.path()).unwrap();

        let mut restored = WalletService::new();
        restored.import(dir.path());
        let account = restored.register_account("+992937452947").unwrap();

        assert_eq!(account.id, 3);
        assert!(matches!(
            restored.register_account("+992937452945"),
            Err(WalletError::PhoneAlreadyRegistered { .. })
        ));
    }

    #[rstest]
    fn test_import_twice_does_not_duplicate(populated: WalletService) {
        let dir = TempDir::new().unwrap();
        populated.export(dir.path()).unwrap();

        let mut restored = WalletService::new();
        restored.import(dir.path());
        restored.import(dir.path());

        assert_eq!(restored.accounts().len(), 2);
        assert_eq!(restored.payments().len(), 4);
        assert_eq!(restored.favorites().len(), 1);
    }

    #[rstest]
    fn test_import_overwrites_existing_records(populated: WalletService) {
        let dir = TempDir::new().unwrap();
        populated.export(dir.path()).unwrap();

        let mut other = WalletService::new();
        let account = other.register_account("+992937452945").unwrap();
        other.deposit(account.id, Money(1)).unwrap();
        other.import(dir.path());

        assert_eq!(other.accounts().len(), 2);
        assert_eq!(
            other.find_account_by_id(1).unwrap().balance,
            populated.find_account_by_id(1).unwrap().balance
        );
    }

    #[rstest]
    fn test_export_without_payments_writes_accounts_only() {
        let dir = TempDir::new().unwrap();
        let mut service = WalletService::new();
        service.register_account("+1").unwrap();

        service.export(dir.path()).unwrap();

        assert_eq!(
            fs::read_to_string(dir.path().join("accounts.dump")).unwrap(),
            "1;+1;0\n"
        );
        assert!(!dir.path().join("payments.dump").exists());
        assert!(!dir.path().join("favorites.dump").exists());
    }

    #[rstest]
    fn test_balance_overflow_keeps_ledger_consistent(mut populated: WalletService) {
        let before = populated.find_account_by_id(2).unwrap().balance;

        let result = populated.deposit(2, Money(i64::MAX));

        assert!(matches!(result, Err(WalletError::ArithmeticOverflow { .. })));
        assert_eq!(populated.find_account_by_id(2).unwrap().balance, before);
    }

    #[rstest]
    fn test_legacy_file_with_trailing_newline(populated: WalletService) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("accounts.txt");
        populated.export_to_file(&path).unwrap();
        let mut raw = fs::read_to_string(&path).unwrap();
        raw.push('\n');
        fs::write(&path, raw).unwrap();

        let mut restored = WalletService::new();
        restored.import_from_file(&path).unwrap();

        assert_eq!(restored.accounts(), populated.accounts());
    }

    #[rstest]
    fn test_legacy_single_file_round_trip(populated: WalletService) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data").join("accounts.txt");
        populated.export_to_file(&path).unwrap();

        let mut restored = WalletService::new();
        let appended = restored.import_from_file(&path).unwrap();

        assert_eq!(appended, 2);
        assert_eq!(restored.accounts(), populated.accounts());
    }

    #[rstest]
    fn test_payment_history_paging() {
        let dir = TempDir::new().unwrap();
        let mut service = WalletService::new();
        let account = service.register_account("+1").unwrap();
        service.deposit(account.id, Money(100)).unwrap();
        for _ in 0..15 {
            service.pay(account.id, Money(1), "auto").unwrap();
        }

        let history = service.export_account_history(account.id).unwrap();
        let files = service.history_to_files(&history, dir.path(), 4).unwrap();

        let counts: Vec<usize> = files
            .iter()
            .map(|path| fs::read_to_string(path).unwrap().lines().count())
            .collect();
        assert_eq!(counts, vec![4, 4, 4, 3]);
        assert!(dir.path().join("payments4.dump").is_file());
    }

    #[rstest]
    #[tokio::test]
    async fn test_sum_matches_sequential_total(
        populated: WalletService,
        #[values(1, 2, 3, 7)] workers: usize,
    ) {
        let sequential: i64 = populated.payments().iter().map(|p| p.amount.as_minor()).sum();
        assert_eq!(
            populated.sum_payments(workers).await.unwrap(),
            Money(sequential)
        );
    }

    #[rstest]
    #[tokio::test]
    async fn test_filter_by_account(
        populated: WalletService,
        #[values(1, 3, 7)] workers: usize,
    ) {
        let first = populated.filter_payments(1, workers).await.unwrap();
        assert_eq!(first.len(), 3);
        assert!(first.iter().all(|p| p.account_id == 1));

        assert!(populated
            .filter_payments(42, workers)
            .await
            .unwrap()
            .is_empty());
    }

    #[rstest]
    #[tokio::test]
    async fn test_filter_by_fn(populated: WalletService) {
        let failed = populated
            .filter_payments_by_fn(
                |p: &wallet_service::Payment| p.status == PaymentStatus::Fail,
                2,
            )
            .await
            .unwrap();

        assert_eq!(failed.len(), 1);
        assert_eq!(failed[0].category, "rent");
    }

    #[rstest]
    #[tokio::test]
    async fn test_progress_totals_to_sum(populated: WalletService) {
        let mut receiver = populated.sum_payments_with_progress(3);

        let mut messages = 0;
        let mut total = 0;
        while let Some(progress) = receiver.recv().await {
            messages += 1;
            total += progress.result.as_minor();
        }

        assert_eq!(messages, populated.payments().len());
        assert_eq!(Money(total), populated.sum_payments(1).await.unwrap());
    }
}
