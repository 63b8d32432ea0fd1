use crate::models::{Announcement, Priority, Resident};
use chrono::{TimeZone, Utc};

pub const MERCHANT_ID: &str = "CLUSTER_KALITA_001";
pub const CURRENCY: &str = "IDR";
pub const TRANSACTION_PREFIX: &str = "TXN";
pub const TRANSACTION_SUFFIX_LEN: usize = 6;
pub const PAYMENT_VALIDITY_HOURS: i64 = 24;
pub const DESCRIPTION_PREFIX: &str = "Iuran RT/RW";
pub const MONTHLY_DUES: u64 = 175_000;

pub const QR_FAILURE_NOTICE: &str = "Gagal membuat QR Code. Silakan coba lagi.";
pub const COPY_FAILURE_NOTICE: &str = "Gagal menyalin payload. Silakan coba lagi.";

const DEMO_RESIDENTS: &[(u32, &str, &str)] = &[
    (1, "Budi Santoso", "Jl. Kalita Blok A No. 15"),
    (2, "Siti Nurhaliza", "Jl. Kalita Blok B No. 8"),
    (3, "Ahmad Wijaya", "Jl. Kalita Blok C No. 22"),
    (4, "Rina Marlina", "Jl. Kalita Blok A No. 7"),
    (5, "Dedi Kurniawan", "Jl. Kalita Blok D No. 12"),
];

pub fn demo_residents() -> Vec<Resident> {
    DEMO_RESIDENTS
        .iter()
        .map(|(id, name, address)| Resident {
            id: *id,
            name: name.to_string(),
            address: address.to_string(),
            amount: MONTHLY_DUES,
        })
        .collect()
}

pub fn demo_announcements() -> Vec<Announcement> {
    let at = |day: u32, hour: u32| {
        Utc.with_ymd_and_hms(2024, 5, day, hour, 0, 0)
            .single()
            .unwrap_or_default()
    };
    vec![
        Announcement {
            id: 1,
            title: "Kerja Bakti Minggu Ini".to_string(),
            content: "Kerja bakti membersihkan saluran air, Minggu pukul 07.00 di pos RT."
                .to_string(),
            priority: Priority::High,
            active: true,
            created_at: at(6, 8),
        },
        Announcement {
            id: 2,
            title: "Pembayaran Iuran Bulanan".to_string(),
            content: "Iuran bulan ini dapat dibayar melalui QRIS paling lambat tanggal 10."
                .to_string(),
            priority: Priority::Medium,
            active: true,
            created_at: at(3, 9),
        },
        Announcement {
            id: 3,
            title: "Jadwal Ronda".to_string(),
            content: "Jadwal ronda malam terbaru sudah ditempel di papan pengumuman."
                .to_string(),
            priority: Priority::Low,
            active: true,
            created_at: at(1, 19),
        },
        Announcement {
            id: 4,
            title: "Pemadaman Listrik".to_string(),
            content: "Pemadaman listrik terjadwal sudah selesai.".to_string(),
            priority: Priority::Medium,
            active: false,
            created_at: at(2, 10),
        },
    ]
}
