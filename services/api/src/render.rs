use chrono::{Duration, NaiveDate};
use schengen_calc::compliance::{
    ComplianceReport, DailyStatus, SchengenCountry, TripConflict, TripProjection,
};

pub(crate) fn render_report(report: &ComplianceReport, timeline: Option<&[DailyStatus]>) {
    let summary = report.summary();

    println!("Schengen compliance check");
    println!(
        "Window: {} -> {} (reference {})",
        summary.window_start, summary.window_end, summary.reference_date
    );
    println!(
        "Status: {} | {} days used | {} days remaining",
        summary.status_label, summary.days_used, summary.days_remaining
    );
    if summary.overstay_days > 0 {
        println!("Overstay: {} days over the allowance", summary.overstay_days);
    }

    if summary.trip_usage.is_empty() {
        println!("\nTrips in window: none");
    } else {
        println!("\nTrips in window");
        for usage in &summary.trip_usage {
            println!(
                "- {} ({}): {} -> {}, {} days counted",
                usage.trip_id,
                usage.country.as_deref().unwrap_or("unspecified"),
                usage.entry,
                usage.exit,
                usage.days_in_window
            );
        }
    }

    if !summary.excluded_trips.is_empty() {
        println!("\nNot counted (outside the Schengen area)");
        for trip in &summary.excluded_trips {
            println!(
                "- {} ({}): {} -> {}",
                trip.trip_id,
                trip.country.as_deref().unwrap_or("unspecified"),
                trip.entry,
                trip.exit
            );
        }
    }

    match summary.peak_date {
        Some(peak) => println!(
            "\nHistory peak: {} days on {}",
            summary.peak_days_used, peak
        ),
        None => println!("\nHistory peak: no recorded presence"),
    }

    if summary.overstay_periods.is_empty() {
        println!("Past overstays: none");
    } else {
        println!("Past overstays");
        for period in &summary.overstay_periods {
            println!(
                "- {} -> {}: {} days present, up to {} over",
                period.start, period.end, period.presence_days, period.max_overstay_days
            );
        }
    }

    if summary.conflicts.is_empty() {
        println!("\nTrip conflicts: none");
    } else {
        println!("\nTrip conflicts");
        for conflict in &summary.conflicts {
            println!("- [{}] {}", conflict.kind_label, conflict.detail);
        }
    }

    if let Some(days) = timeline {
        println!("\nDaily usage");
        for day in days.iter().filter(|day| day.present) {
            let marker = if day.overstay { " OVERSTAY" } else { "" };
            println!(
                "- {}: {} used, {} remaining{}",
                day.date, day.days_used, day.days_remaining, marker
            );
        }
    }
}

pub(crate) fn render_projection(projection: &TripProjection, conflicts: &[TripConflict]) {
    println!("Planned trip {}", projection.trip_id);
    println!(
        "Dates: {} -> {} ({} days)",
        projection.entry, projection.exit, projection.duration_days
    );

    if !projection.counts_toward_allowance {
        println!("Destination is outside the Schengen area; the allowance is unaffected.");
    }

    if projection.compliant {
        println!("Verdict: compliant");
    } else {
        println!(
            "Verdict: overstay of up to {} days",
            projection.overstay_days
        );
        if let Some(day) = projection.first_violation {
            println!("First day over the allowance: {}", day);
        }
    }

    println!(
        "On exit: {} days used, {} remaining (peak {})",
        projection.days_used_on_exit,
        projection.days_remaining_on_exit,
        projection.peak_days_used
    );
    match projection.latest_compliant_exit {
        Some(exit) => println!(
            "Longest compliant stay from {}: {} days (leave by {})",
            projection.entry, projection.max_stay_from_entry, exit
        ),
        None => println!("No compliant stay can start on {}", projection.entry),
    }

    if !conflicts.is_empty() {
        println!("\nConflicts with recorded trips");
        for conflict in conflicts {
            println!("- [{}] {}", conflict.kind.label(), conflict.describe());
        }
    }
}

pub(crate) fn render_earliest_entry(
    length_days: u32,
    from: NaiveDate,
    earliest: Option<NaiveDate>,
    max_stay_days: u32,
) {
    println!("Earliest entry for a {}-day stay (searching from {})", length_days, from);
    match earliest {
        Some(entry) => {
            match entry.checked_add_signed(Duration::days(i64::from(length_days) - 1)) {
                Some(exit) => println!("Enter on {} and leave by {}", entry, exit),
                None => println!("Enter on {}", entry),
            }
        }
        None => println!(
            "No entry date found; stays must be between 1 and {} days",
            max_stay_days
        ),
    }
}

pub(crate) fn render_countries() {
    println!("Schengen member states");
    for country in SchengenCountry::ordered() {
        println!("- {} ({})", country.label(), country.iso_code());
    }
}
