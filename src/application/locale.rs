use crate::entities::{Locale, YearMonth};
use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, TimeZone, Utc};

fn chrono_locale(locale: Locale) -> chrono::Locale {
    match locale {
        Locale::JaJp => chrono::Locale::ja_JP,
        Locale::EnUs => chrono::Locale::en_US,
        Locale::KoKr => chrono::Locale::ko_KR,
        Locale::ZhCn => chrono::Locale::zh_CN,
        Locale::ZhTw => chrono::Locale::zh_TW,
        Locale::IdId => chrono::Locale::id_ID,
        Locale::ThTh => chrono::Locale::th_TH,
        Locale::ArSa => chrono::Locale::ar_SA,
    }
}

fn at_midnight(date: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_time(NaiveTime::default()))
}

/// Localized "month year" title, e.g. `January 2024` or `2024年1月`.
pub fn month_title(locale: Locale, year_month: YearMonth) -> String {
    let pattern = match locale {
        Locale::JaJp | Locale::ZhCn | Locale::ZhTw => "%Y年%-m月",
        Locale::KoKr => "%Y년 %-m월",
        _ => "%B %Y",
    };
    at_midnight(year_month.first_day())
        .format_localized(pattern, chrono_locale(locale))
        .to_string()
}

/// Seven short weekday names, starting at `start_week_on` (0 = Sunday).
pub fn weekday_headers(locale: Locale, start_week_on: u32) -> Vec<String> {
    // 2021-08-01 was a Sunday.
    let sunday = NaiveDate::from_ymd_opt(2021, 8, 1).unwrap_or_default();
    (0..7)
        .map(|i| {
            let dow = (i + start_week_on) % 7;
            let date = sunday + chrono::Duration::days(dow as i64);
            debug_assert_eq!(date.weekday().num_days_from_sunday(), dow);
            at_midnight(date)
                .format_localized("%a", chrono_locale(locale))
                .to_string()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn english_titles() {
        assert_eq!(month_title(Locale::EnUs, YearMonth::new(2024, 1)), "January 2024");
    }

    #[test]
    fn cjk_titles_use_numeric_months() {
        assert_eq!(month_title(Locale::JaJp, YearMonth::new(2024, 3)), "2024年3月");
        assert_eq!(month_title(Locale::KoKr, YearMonth::new(2024, 12)), "2024년 12월");
    }

    #[test]
    fn weekday_headers_start_at_configured_day() {
        let sunday_first = weekday_headers(Locale::EnUs, 0);
        assert_eq!(sunday_first.len(), 7);
        assert_eq!(sunday_first[0], "Sun");
        assert_eq!(sunday_first[6], "Sat");

        let monday_first = weekday_headers(Locale::EnUs, 1);
        assert_eq!(monday_first[0], "Mon");
        assert_eq!(monday_first[6], "Sun");
    }
}
