//! Bundled historical price data
//!
//! Approximate monthly average USD prices at key dates, 2010 onwards.
//! Months not listed are resolved by the table's gap policy.

/// (year, month, price_usd)
pub const BUNDLED_PRICES: &[(i32, u32, f64)] = &[
    // 2010-2013
    (2010, 7, 0.08),
    (2010, 11, 0.25),
    (2011, 1, 0.30),
    (2011, 6, 15.00),
    (2011, 12, 4.00),
    (2012, 1, 5.00),
    (2012, 6, 6.50),
    (2012, 12, 13.00),
    (2013, 1, 13.50),
    (2013, 4, 120.00),
    (2013, 6, 100.00),
    (2013, 11, 900.00),
    (2013, 12, 750.00),
    // 2014-2016
    (2014, 1, 800.00),
    (2014, 6, 600.00),
    (2014, 12, 320.00),
    (2015, 1, 280.00),
    (2015, 6, 250.00),
    (2015, 12, 430.00),
    (2016, 1, 430.00),
    (2016, 6, 650.00),
    (2016, 12, 900.00),
    // 2017-2018
    (2017, 1, 1000.00),
    (2017, 3, 1200.00),
    (2017, 6, 2500.00),
    (2017, 9, 4000.00),
    (2017, 12, 14000.00),
    (2018, 1, 11000.00),
    (2018, 6, 6500.00),
    (2018, 12, 3800.00),
    // 2019
    (2019, 1, 3600.00),
    (2019, 3, 4000.00),
    (2019, 6, 10000.00),
    (2019, 9, 8500.00),
    (2019, 12, 7200.00),
    // 2020
    (2020, 1, 7200.00),
    (2020, 3, 6400.00),
    (2020, 6, 9300.00),
    (2020, 9, 10800.00),
    (2020, 12, 19000.00),
    // 2021
    (2021, 1, 32000.00),
    (2021, 3, 55000.00),
    (2021, 6, 35000.00),
    (2021, 9, 43000.00),
    (2021, 11, 65000.00),
    (2021, 12, 50000.00),
    // 2022
    (2022, 1, 38000.00),
    (2022, 3, 42000.00),
    (2022, 6, 20000.00),
    (2022, 9, 19000.00),
    (2022, 12, 16500.00),
    // 2023
    (2023, 1, 17000.00),
    (2023, 3, 23000.00),
    (2023, 6, 27000.00),
    (2023, 9, 26000.00),
    (2023, 12, 42000.00),
    // 2024
    (2024, 1, 43000.00),
    (2024, 3, 67000.00),
    (2024, 6, 61000.00),
    (2024, 9, 63000.00),
    (2024, 10, 67000.00),
    (2024, 11, 72000.00),
    (2024, 12, 95000.00),
    // 2025
    (2025, 1, 105000.00),
    (2025, 2, 98000.00),
    (2025, 3, 115000.00),
    (2025, 4, 120000.00),
    (2025, 5, 125000.00),
    (2025, 6, 130000.00),
    (2025, 7, 135000.00),
    (2025, 8, 140000.00),
    (2025, 9, 145000.00),
    (2025, 10, 150000.00),
];
