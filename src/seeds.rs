//! Built-in seed content so the app is usable without external config:
//! a small course/subject directory, a starter question bank, and one
//! planning material per subject.

use crate::domain::{
  Course, CurriculumMaterial, Difficulty, Question, QuestionKind, Subject,
};

pub fn seed_courses() -> Vec<Course> {
  vec![
    Course { id: "c-5a".into(), name: "5° Básico A".into(), grade: "5° Básico".into() },
    Course { id: "c-6a".into(), name: "6° Básico A".into(), grade: "6° Básico".into() },
  ]
}

pub fn seed_subjects() -> Vec<Subject> {
  vec![
    Subject { id: "s-mat5".into(), name: "Matemática".into(), course_id: "c-5a".into() },
    Subject { id: "s-len5".into(), name: "Lenguaje y Comunicación".into(), course_id: "c-5a".into() },
    Subject { id: "s-cie6".into(), name: "Ciencias Naturales".into(), course_id: "c-6a".into() },
  ]
}

pub fn seed_questions() -> Vec<Question> {
  vec![
    Question {
      id: "q-mat-001".into(),
      text: "¿Cuánto es 3/4 + 1/4?".into(),
      difficulty: Difficulty::Easy,
      subject_id: "s-mat5".into(),
      grade: "5° Básico".into(),
      tags: vec!["fracciones".into()],
      kind: QuestionKind::MultipleChoice {
        choices: vec!["1/2".into(), "1".into(), "4/8".into(), "2".into()],
        correct: 1,
      },
    },
    Question {
      id: "q-mat-002".into(),
      text: "Ordena de menor a mayor: 0,5 — 1/3 — 0,75".into(),
      difficulty: Difficulty::Medium,
      subject_id: "s-mat5".into(),
      grade: "5° Básico".into(),
      tags: vec!["fracciones".into(), "decimales".into()],
      kind: QuestionKind::Open,
    },
    Question {
      id: "q-mat-003".into(),
      text: "Un rectángulo mide 3 cm por 7 cm. Calcula su perímetro y su área, y explica la diferencia entre ambos.".into(),
      difficulty: Difficulty::Hard,
      subject_id: "s-mat5".into(),
      grade: "5° Básico".into(),
      tags: vec!["geometría".into()],
      kind: QuestionKind::Open,
    },
    Question {
      id: "q-mat-004".into(),
      text: "Todo número par es divisible por 2.".into(),
      difficulty: Difficulty::Easy,
      subject_id: "s-mat5".into(),
      grade: "5° Básico".into(),
      tags: vec!["números".into()],
      kind: QuestionKind::TrueFalse { answer: true },
    },
    Question {
      id: "q-len-001".into(),
      text: "¿Cuál de las siguientes palabras es un sustantivo propio?".into(),
      difficulty: Difficulty::Easy,
      subject_id: "s-len5".into(),
      grade: "5° Básico".into(),
      tags: vec!["gramática".into()],
      kind: QuestionKind::MultipleChoice {
        choices: vec!["ciudad".into(), "Santiago".into(), "grande".into(), "correr".into()],
        correct: 1,
      },
    },
    Question {
      id: "q-len-002".into(),
      text: "Identifica la idea principal del párrafo leído y justifica con una cita.".into(),
      difficulty: Difficulty::Medium,
      subject_id: "s-len5".into(),
      grade: "5° Básico".into(),
      tags: vec!["comprensión lectora".into()],
      kind: QuestionKind::Open,
    },
    Question {
      id: "q-len-003".into(),
      text: "Escribe un texto argumentativo breve (8-10 líneas) sobre el uso de celulares en la sala de clases.".into(),
      difficulty: Difficulty::Hard,
      subject_id: "s-len5".into(),
      grade: "5° Básico".into(),
      tags: vec!["escritura".into(), "argumentación".into()],
      kind: QuestionKind::Open,
    },
    Question {
      id: "q-cie-001".into(),
      text: "La fotosíntesis ocurre principalmente en las hojas.".into(),
      difficulty: Difficulty::Easy,
      subject_id: "s-cie6".into(),
      grade: "6° Básico".into(),
      tags: vec!["fotosíntesis".into()],
      kind: QuestionKind::TrueFalse { answer: true },
    },
    Question {
      id: "q-cie-002".into(),
      text: "Describe el recorrido de la energía desde el sol hasta un consumidor secundario.".into(),
      difficulty: Difficulty::Hard,
      subject_id: "s-cie6".into(),
      grade: "6° Básico".into(),
      tags: vec!["cadenas tróficas".into()],
      kind: QuestionKind::Open,
    },
  ]
}

pub fn seed_materials() -> Vec<CurriculumMaterial> {
  vec![
    CurriculumMaterial {
      course_id: "c-5a".into(),
      subject_id: Some("s-mat5".into()),
      title: "Planificación Unidad 1: Fracciones y decimales".into(),
      objectives: vec![
        "OA 7: Demostrar que comprenden las fracciones propias".into(),
        "OA 8: Resolver adiciones y sustracciones de fracciones con igual denominador".into(),
      ],
    },
    CurriculumMaterial {
      course_id: "c-5a".into(),
      subject_id: Some("s-len5".into()),
      title: "Planificación Unidad 1: Comprensión de textos".into(),
      objectives: vec![
        "OA 3: Leer y familiarizarse con un amplio repertorio de literatura".into(),
        "OA 6: Leer independientemente y comprender textos no literarios".into(),
      ],
    },
    // Course-wide material: applies to any subject of the course.
    CurriculumMaterial {
      course_id: "c-5a".into(),
      subject_id: None,
      title: "Proyecto interdisciplinario semestre 1".into(),
      objectives: vec!["OA T: Trabajar colaborativamente en proyectos".into()],
    },
    CurriculumMaterial {
      course_id: "c-6a".into(),
      subject_id: Some("s-cie6".into()),
      title: "Planificación Unidad 2: Energía y ecosistemas".into(),
      objectives: vec![
        "OA 1: Explicar los efectos de la actividad humana en los ecosistemas".into(),
        "OA 16: Describir el flujo de la energía en cadenas tróficas".into(),
      ],
    },
  ]
}
