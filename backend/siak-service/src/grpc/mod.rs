pub mod server;

// Include generated proto code
pub mod siak {
    tonic::include_proto!("tracer_study_grpc");
}

pub use server::MhsBiodataApiHandler;

use crate::models::MhsBiodata;

impl From<MhsBiodata> for siak::MhsBiodata {
    fn from(record: MhsBiodata) -> Self {
        Self {
            nim: record.nim,
            nama: record.nama,
            kode_fakultas: record.kode_fakultas,
            nama_fakultas: record.nama_fakultas,
            kode_prodi: record.kode_prodi,
            nama_prodi: record.nama_prodi,
            jenjang: record.jenjang,
            angkatan: record.angkatan,
            tgl_sidang: record.tgl_sidang,
            kode_status: record.kode_status,
            email: record.email,
            hp: record.hp,
        }
    }
}
