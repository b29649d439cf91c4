use chrono::NaiveDate;
use expense_forecast::{
    ExpenseForecaster, ForecastError, InMemoryHistory, Periodicity, TransactionRecord,
};

fn main() -> Result<(), ForecastError> {
    // Two years of rent, utilities and groceries
    let mut history = InMemoryHistory::default();
    for idx in 0..24 {
        let year = 2023 + idx / 12;
        let month = (idx % 12) as u32 + 1;
        let day = |d: u32| NaiveDate::from_ymd_opt(year, month, d).unwrap();

        history.push(TransactionRecord::expense(950.0, day(1), "Rent", Periodicity::Monthly));
        history.push(TransactionRecord::expense(
            70.0 + (month as f64 - 6.5).abs() * 8.0,
            day(5),
            "Utilities",
            Periodicity::Monthly,
        ));
        for week in 0..4 {
            history.push(
                TransactionRecord::expense(
                    55.0 + (idx % 4) as f64 * 6.0,
                    day(2 + week * 7),
                    "Groceries",
                    Periodicity::Variable,
                )
                .with_quantity(5),
            );
        }
        history.push(TransactionRecord::income(3200.0, day(28), "Salary"));
    }

    let forecaster = ExpenseForecaster::new(history);
    let report = forecaster.forecast_from(6, NaiveDate::from_ymd_opt(2024, 12, 31).unwrap())?;

    print!("{}", report);
    println!("Top features:");
    for importance in report.importances.iter().take(5) {
        println!("  {:<28} {:.4}", importance.feature, importance.importance);
    }

    Ok(())
}
