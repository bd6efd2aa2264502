// Dataset providers - Sample and randomly drawn data for each widget
use crate::domain::error::DashboardError;
use crate::domain::grid::GridCell;
use crate::domain::time_series::{DailySeries, TimeSeries};
use chrono::NaiveDate;
use rand::Rng;
use serde::Serialize;

/// Parameters of a random daily draw. Values come from `[min, max)`.
#[derive(Debug, Clone, PartialEq)]
pub struct RandomDraw {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub per_day: usize,
    pub min: i64,
    pub max: i64,
}

impl RandomDraw {
    pub fn daily_scores() -> Self {
        Self {
            start: ymd(2024, 8, 18),
            end: ymd(2024, 8, 23),
            per_day: 50,
            min: 65,
            max: 100,
        }
    }

    pub fn sleep_hours() -> Self {
        Self {
            start: ymd(2024, 9, 1),
            end: ymd(2024, 9, 30),
            per_day: 1,
            min: 5,
            max: 10,
        }
    }

    fn days(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.start.iter_days().take_while(move |d| *d <= self.end)
    }

    fn draw(&self, rng: &mut impl Rng) -> f64 {
        if self.max <= self.min {
            return self.min as f64;
        }
        rng.gen_range(self.min..self.max) as f64
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SleepDay {
    pub sleep: f64,
    pub active: f64,
}

const HOURS_PER_DAY: f64 = 24.0;

/// Heart rate sampled every ninety minutes over one day.
pub fn heart_rate_series() -> Result<TimeSeries<String, f64>, DashboardError> {
    const TIMES: [&str; 16] = [
        "1:00", "2:30", "4:00", "5:30", "7:00", "8:30", "10:00", "11:30", "13:00", "14:30",
        "16:00", "17:30", "19:00", "20:30", "22:00", "23:30",
    ];
    const BPM: [f64; 16] = [
        80.0, 85.0, 70.0, 75.0, 90.0, 95.0, 100.0, 110.0, 105.0, 98.0, 100.0, 90.0, 95.0, 85.0,
        87.0, 120.0,
    ];

    TimeSeries::from_pairs(TIMES.iter().map(|t| t.to_string()).zip(BPM))
}

/// `per_day` scores for every day of the draw, grouped by day.
pub fn daily_scores(draw: &RandomDraw, rng: &mut impl Rng) -> Result<DailySeries<f64>, DashboardError> {
    let mut pairs = Vec::new();
    for day in draw.days() {
        for _ in 0..draw.per_day {
            pairs.push((day, draw.draw(rng)));
        }
    }
    TimeSeries::from_pairs(pairs)
}

/// One sleep/active split per day; the two always add up to a full day.
pub fn sleep_log(draw: &RandomDraw, rng: &mut impl Rng) -> Result<DailySeries<SleepDay>, DashboardError> {
    let pairs: Vec<_> = draw
        .days()
        .map(|day| {
            let sleep = draw.draw(rng);
            (
                day,
                SleepDay {
                    sleep,
                    active: HOURS_PER_DAY - sleep,
                },
            )
        })
        .collect();
    TimeSeries::from_pairs(pairs)
}

/// Six weeks of sleep scores, one cell per weekday.
pub fn weekly_sleep_cells() -> Vec<GridCell> {
    const WEEKDAYS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];
    const SCORES: [[f64; 7]; 6] = [
        [1.0, 3.0, 5.0, 7.0, 2.0, 4.0, 6.0],
        [2.0, 6.0, 4.0, 3.0, 5.0, 7.0, 8.0],
        [4.0, 5.0, 6.0, 3.0, 8.0, 2.0, 7.0],
        [6.0, 8.0, 2.0, 5.0, 7.0, 4.0, 3.0],
        [7.0, 2.0, 8.0, 4.0, 6.0, 3.0, 5.0],
        [3.0, 4.0, 6.0, 8.0, 2.0, 5.0, 7.0],
    ];

    SCORES
        .iter()
        .enumerate()
        .flat_map(|(week, row)| {
            WEEKDAYS
                .iter()
                .zip(row)
                .map(move |(day, score)| GridCell::new(format!("{}w", week + 1), *day, *score))
        })
        .collect()
}

/// Term frequencies gathered from peer feedback.
pub fn feedback_terms() -> Vec<(String, u32)> {
    [
        ("PROACTIVE", 60),
        ("COLLABORATION", 52),
        ("ENGAGED", 35),
        ("COMMUNICATION", 28),
        ("OWNERSHIP", 22),
        ("CREATIVE", 18),
        ("CONSISTENT", 16),
        ("ENERGETIC", 14),
        ("AWARENESS", 12),
        ("TEAMWORK", 11),
        ("RESILIENT", 10),
    ]
    .into_iter()
    .map(|(term, weight)| (term.to_string(), weight))
    .collect()
}

pub(crate) fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid calendar date")
}
